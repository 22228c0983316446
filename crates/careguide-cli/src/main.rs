use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod check;
mod cli;
mod commands;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // A missing .env is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Assess(args) => commands::assess(args).await,
        Command::Chat(args) => commands::chat_about(args).await,
        Command::WhatIf(args) => commands::simulate(args).await,
        Command::Check => commands::check_setup(),
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
