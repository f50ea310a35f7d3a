//! Playbook Validator CLI
//!
//! Validates playbook files before they are executed and reports errors
//! and warnings per file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use playbook_validator::{load_file, LogFormat, ResultExt, Validator, ValidatorConfig};

#[derive(Parser)]
#[command(name = "playbook-validate")]
#[command(version, about = "Validate playbooks before running them", long_about = None)]
struct Cli {
    /// Playbook files (YAML or JSON)
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Treat warnings as failures
    #[arg(long)]
    strict: bool,

    /// Print a JSON report instead of text lines
    #[arg(long)]
    json: bool,

    /// Log output format (overrides PLAYBOOK_LOG_FORMAT)
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Debug, Serialize)]
struct WarningEntry {
    kind: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unresolved: Option<Vec<String>>,
    warnings: Vec<WarningEntry>,
}

impl FileReport {
    fn passed(&self, strict: bool) -> bool {
        self.valid && !(strict && !self.warnings.is_empty())
    }
}

/// Initialize tracing/logging on stderr.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn check_file(validator: &Validator, path: &Path) -> FileReport {
    let display = path.display().to_string();

    let document = match load_file(path).log(format!("loading {}", display)) {
        Ok(document) => document,
        Err(e) => {
            return FileReport {
                path: display,
                valid: false,
                error: Some(e.to_string()),
                unresolved: None,
                warnings: Vec::new(),
            }
        }
    };

    let report = validator.validate(&document);
    let error = report.error();

    FileReport {
        path: display,
        valid: report.is_valid(),
        error: error.map(|e| e.to_string()),
        unresolved: error
            .and_then(|e| e.unresolved_names())
            .map(|names| names.iter().cloned().collect()),
        warnings: report
            .warnings
            .iter()
            .map(|w| WarningEntry {
                kind: w.kind(),
                message: w.message(),
            })
            .collect(),
    }
}

fn print_text(report: &FileReport) {
    match report.error {
        None => println!("{}: ok", report.path),
        Some(ref error) => println!("{}: FAILED: {}", report.path, error),
    }
    for warning in &report.warnings {
        println!("{}: warning: {} ({})", report.path, warning.message, warning.kind);
    }
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ValidatorConfig::from_env().context("Failed to load configuration")?;

    init_tracing(cli.log_format.unwrap_or(config.log_format));

    let strict = cli.strict || config.strict;
    let validator = Validator::new().context("Failed to compile playbook grammars")?;

    tracing::debug!(files = cli.files.len(), strict, "Validating playbooks");

    let reports: Vec<FileReport> = cli
        .files
        .iter()
        .map(|path| check_file(&validator, path))
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        reports.iter().for_each(print_text);
    }

    let failed = reports.iter().filter(|r| !r.passed(strict)).count();
    if failed > 0 {
        tracing::info!(failed, total = reports.len(), "Validation failed");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
