use careguide_bedrock::client::{BedrockModel, build_sdk_config};
use careguide_export::json::{read_report, write_report};
use careguide_export::render::render_markdown;
use careguide_pipeline::followup::{chat, explain_what_if, what_if};
use careguide_pipeline::loader::load_guidelines;
use careguide_pipeline::{CareGuideConfig, Pipeline};
use eyre::{Result, WrapErr};
use tracing::info;

use crate::check;
use crate::cli::{AssessArgs, ChatArgs, OutputFormat, WhatIfArgs};

fn load_config() -> Result<CareGuideConfig> {
    CareGuideConfig::from_env().wrap_err("invalid configuration")
}

async fn connect(config: &CareGuideConfig) -> BedrockModel {
    let sdk_config = build_sdk_config(&config.region, config.aws_profile.as_deref()).await;
    BedrockModel::new(&sdk_config, config.model_id.clone(), config.inference)
}

pub async fn assess(args: AssessArgs) -> Result<()> {
    let mut config = load_config()?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(path) = args.guidelines {
        config.guidelines_path = path;
    }
    if let Some(deid) = args.deid {
        config.deid_mode = deid.into();
    }
    if args.no_review {
        config.review_assessments = false;
    }

    let guidelines = load_guidelines(&config.guidelines_path)?;
    let model = connect(&config).await;

    let report = Pipeline::new(&model, &config, &guidelines)
        .run_paths(&args.files)
        .await?;

    match args.format {
        OutputFormat::Markdown => println!("{}", render_markdown(&report)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if !args.no_export {
        let path = write_report(&report, &config.output_dir)?;
        info!(path = %path.display(), "report exported");
        eprintln!("Report saved to {}", path.display());
    }
    Ok(())
}

pub async fn chat_about(args: ChatArgs) -> Result<()> {
    let config = load_config()?;
    let report = read_report(&args.report)?;
    let model = connect(&config).await;

    let answer = chat(&model, &report, &args.question, &config.call_policy).await?;
    println!("{}", answer.output);
    Ok(())
}

pub async fn simulate(args: WhatIfArgs) -> Result<()> {
    let config = load_config()?;
    let report = read_report(&args.report)?;

    let scenario = what_if(&report, &args.activity, &config.weights)?;
    println!("Activity: {} ({})", scenario.description, scenario.recommendation_id);
    println!("Current score: {}/100", scenario.current.score);
    println!(
        "Simulated score: {}/100 ({:+})",
        scenario.simulated.score,
        scenario.gain()
    );

    if args.explain {
        let model = connect(&config).await;
        let explanation = explain_what_if(&model, &report, &scenario, &config.call_policy).await?;
        println!("\n{}", explanation.output);
    }
    Ok(())
}

pub fn check_setup() -> Result<()> {
    let config = load_config()?;
    let root = std::env::current_dir().wrap_err("cannot read the working directory")?;

    let report = check::run_checks(&config, &root, |var| std::env::var(var).ok());
    print!("{report}");

    if !report.is_ready() {
        eyre::bail!("setup check found problems");
    }
    println!("Setup looks good.");
    Ok(())
}
