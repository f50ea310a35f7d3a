//! Configuration for the validator CLI.

use serde::Deserialize;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration loaded from environment variables.
///
/// Environment variables are prefixed with `PLAYBOOK_`:
/// - `PLAYBOOK_STRICT`: Treat warnings as failures (default: false)
/// - `PLAYBOOK_LOG_FORMAT`: `text` or `json` (default: text)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidatorConfig {
    /// Fail when a valid playbook produced warnings
    #[serde(default)]
    pub strict: bool,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl ValidatorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("PLAYBOOK_").from_env::<ValidatorConfig>()
    }
}
