use std::path::PathBuf;

use careguide_pipeline::DeidMode;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Preventive-care engagement report from a patient record.
#[derive(Debug, Parser)]
#[command(name = "careguide", version)]
pub struct Cli {
    /// Emit log events as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full assessment over one or more record files.
    Assess(AssessArgs),
    /// Ask a question about a saved report.
    Chat(ChatArgs),
    /// Re-score a saved report as if one activity were done.
    WhatIf(WhatIfArgs),
    /// Validate configuration, guideline file and output directory.
    Check,
}

#[derive(Debug, Args)]
pub struct AssessArgs {
    /// Plain-text record files, joined in the given order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory for the JSON export.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Guideline table (JSON).
    #[arg(long)]
    pub guidelines: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub deid: Option<DeidArg>,

    /// Skip the second-pass review of each assessment.
    #[arg(long)]
    pub no_review: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Print the report without writing the JSON export.
    #[arg(long)]
    pub no_export: bool,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Saved report (JSON export).
    #[arg(long)]
    pub report: PathBuf,

    pub question: String,
}

#[derive(Debug, Args)]
pub struct WhatIfArgs {
    /// Saved report (JSON export).
    #[arg(long)]
    pub report: PathBuf,

    /// Recommendation id to mark as done, e.g. `rec-2`.
    #[arg(long)]
    pub activity: String,

    /// Ask the model to explain the change.
    #[arg(long)]
    pub explain: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeidArg {
    Model,
    Local,
}

impl From<DeidArg> for DeidMode {
    fn from(arg: DeidArg) -> Self {
        match arg {
            DeidArg::Model => DeidMode::Model,
            DeidArg::Local => DeidMode::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assess_takes_flags_and_files() {
        let cli = Cli::try_parse_from([
            "careguide",
            "assess",
            "a.txt",
            "b.txt",
            "--deid",
            "local",
            "--no-review",
            "--format",
            "json",
        ])
        .unwrap();

        let Command::Assess(args) = cli.command else {
            panic!("expected assess");
        };
        assert_eq!(args.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(args.deid.map(DeidMode::from), Some(DeidMode::Local));
        assert!(args.no_review);
        assert!(!args.no_export);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn assess_requires_a_file() {
        assert!(Cli::try_parse_from(["careguide", "assess"]).is_err());
    }

    #[test]
    fn format_defaults_to_markdown() {
        let cli = Cli::try_parse_from(["careguide", "assess", "record.txt"]).unwrap();
        let Command::Assess(args) = cli.command else {
            panic!("expected assess");
        };
        assert_eq!(args.format, OutputFormat::Markdown);
        assert!(args.deid.is_none());
    }

    #[test]
    fn what_if_parses_activity() {
        let cli = Cli::try_parse_from([
            "careguide",
            "--log-json",
            "what-if",
            "--report",
            "out/assessment.json",
            "--activity",
            "rec-2",
            "--explain",
        ])
        .unwrap();

        assert!(cli.log_json);
        let Command::WhatIf(args) = cli.command else {
            panic!("expected what-if");
        };
        assert_eq!(args.activity, "rec-2");
        assert!(args.explain);
    }

    #[test]
    fn chat_takes_question_positionally() {
        let cli = Cli::try_parse_from([
            "careguide",
            "chat",
            "--report",
            "r.json",
            "Why do I need a colonoscopy?",
        ])
        .unwrap();
        let Command::Chat(args) = cli.command else {
            panic!("expected chat");
        };
        assert_eq!(args.question, "Why do I need a colonoscopy?");
    }

    #[test]
    fn unknown_deid_mode_is_rejected() {
        assert!(Cli::try_parse_from(["careguide", "assess", "r.txt", "--deid", "none"]).is_err());
    }
}
