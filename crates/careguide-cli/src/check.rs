//! Pre-run setup check: credentials, model, guideline file, sample record
//! and output directory.

use std::fmt;
use std::fs;
use std::path::Path;

use careguide_guidelines::GuidelineTable;
use careguide_pipeline::CareGuideConfig;
use careguide_pipeline::config::redact_access_key;

pub const SAMPLE_RECORD: &str = "data/demo_patient_record.txt";

const PROBE_FILE: &str = ".careguide-write-probe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Issue,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckStatus::Ok => "[ ok ]",
            CheckStatus::Warning => "[warn]",
            CheckStatus::Issue => "[FAIL]",
        })
    }
}

#[derive(Debug, Clone)]
pub struct CheckItem {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
}

#[derive(Debug, Default)]
pub struct SetupReport {
    pub items: Vec<CheckItem>,
}

impl SetupReport {
    fn push(&mut self, name: &'static str, status: CheckStatus, detail: impl Into<String>) {
        self.items.push(CheckItem {
            name,
            status,
            detail: detail.into(),
        });
    }

    pub fn count(&self, status: CheckStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    pub fn is_ready(&self) -> bool {
        self.count(CheckStatus::Issue) == 0
    }

    pub fn item(&self, name: &str) -> Option<&CheckItem> {
        self.items.iter().find(|i| i.name == name)
    }
}

impl fmt::Display for SetupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{} {}: {}", item.status, item.name, item.detail)?;
        }
        writeln!(
            f,
            "\n{} issue(s), {} warning(s)",
            self.count(CheckStatus::Issue),
            self.count(CheckStatus::Warning)
        )
    }
}

/// Run every check. `root` is where `.env` and the sample record are looked
/// up; `lookup` reads environment variables.
pub fn run_checks<F>(config: &CareGuideConfig, root: &Path, lookup: F) -> SetupReport
where
    F: Fn(&str) -> Option<String>,
{
    let mut report = SetupReport::default();
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if root.join(".env").is_file() {
        report.push("env file", CheckStatus::Ok, ".env found");
    } else {
        report.push(
            "env file",
            CheckStatus::Warning,
            ".env not found; using the process environment only",
        );
    }

    check_credentials(&mut report, config, &get);

    report.push(
        "model",
        CheckStatus::Ok,
        format!("{} in {}", config.model_id, config.region),
    );

    check_guidelines(&mut report, &config.guidelines_path);

    if root.join(SAMPLE_RECORD).is_file() {
        report.push("sample record", CheckStatus::Ok, SAMPLE_RECORD);
    } else {
        report.push(
            "sample record",
            CheckStatus::Warning,
            format!("{SAMPLE_RECORD} not found"),
        );
    }

    match probe_writable(&config.output_dir) {
        Ok(()) => report.push(
            "output dir",
            CheckStatus::Ok,
            format!("{} is writable", config.output_dir.display()),
        ),
        Err(e) => report.push(
            "output dir",
            CheckStatus::Issue,
            format!("{} is not writable: {e}", config.output_dir.display()),
        ),
    }

    report
}

fn check_credentials<G>(report: &mut SetupReport, config: &CareGuideConfig, get: &G)
where
    G: Fn(&str) -> Option<String>,
{
    if let Some(key_id) = get("AWS_ACCESS_KEY_ID") {
        let key_id = key_id.trim();
        if get("AWS_SECRET_ACCESS_KEY").is_none() {
            report.push(
                "credentials",
                CheckStatus::Issue,
                "AWS_ACCESS_KEY_ID is set but AWS_SECRET_ACCESS_KEY is not",
            );
        } else if !looks_like_access_key(key_id) {
            report.push(
                "credentials",
                CheckStatus::Warning,
                format!(
                    "AWS_ACCESS_KEY_ID {} does not look like an access key id",
                    redact_access_key(key_id)
                ),
            );
        } else {
            report.push(
                "credentials",
                CheckStatus::Ok,
                format!("environment keys ({})", redact_access_key(key_id)),
            );
        }
    } else if let Some(profile) = &config.aws_profile {
        report.push("credentials", CheckStatus::Ok, format!("profile '{profile}'"));
    } else {
        report.push(
            "credentials",
            CheckStatus::Warning,
            "no keys or profile configured; relying on the default AWS credential chain",
        );
    }
}

fn looks_like_access_key(key_id: &str) -> bool {
    key_id.len() == 20
        && (key_id.starts_with("AKIA") || key_id.starts_with("ASIA"))
        && key_id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

fn check_guidelines(report: &mut SetupReport, path: &Path) {
    if !path.exists() {
        report.push(
            "guidelines",
            CheckStatus::Warning,
            format!("{} not found; the guideline source will be skipped", path.display()),
        );
        return;
    }
    match GuidelineTable::load(path) {
        Ok(table) if table.is_empty() => report.push(
            "guidelines",
            CheckStatus::Warning,
            format!("{} contains no guidelines", path.display()),
        ),
        Ok(table) => report.push(
            "guidelines",
            CheckStatus::Ok,
            format!("{} guidelines in {}", table.len(), path.display()),
        ),
        Err(e) => report.push("guidelines", CheckStatus::Issue, e.to_string()),
    }
}

fn probe_writable(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let probe = dir.join(PROBE_FILE);
    fs::write(&probe, b"ok")?;
    fs::remove_file(&probe)
}
