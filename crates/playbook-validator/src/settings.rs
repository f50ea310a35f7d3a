//! Root-level playbook settings.
//!
//! Settings are validated apart from the execution tree: first their shape,
//! then the cross-field rules (schedule syntax, timeout pairing and the
//! name/notification warnings).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PlaybookError, PlaybookResult};
use crate::grammar::{Grammar, NodeKind};
use crate::syntax::SyntaxChecker;
use crate::warning::{PlaybookWarning, Warnings};

/// Key under which settings live at the document root.
pub const SETTINGS_KEY: &str = "settings";

/// Prefix shared by notification channel fields (`log`, `logOnFail`, ...).
pub const LOG_PREFIX: &str = "log";

/// Typed view of a settings mapping that passed the settings grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Playbook display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Cron schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,

    /// Rate schedule, e.g. "5 minutes"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,

    /// Whole-run timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Per-command timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,

    /// Notification channels, keyed by their `log…` field name
    #[serde(flatten)]
    pub notifications: BTreeMap<String, String>,
}

impl Settings {
    /// Scheduled (monitoring) playbooks declare a cron or a rate.
    pub fn is_scheduled(&self) -> bool {
        self.cron.is_some() || self.rate.is_some()
    }

    pub fn has_notification_channel(&self) -> bool {
        self.notifications.keys().any(|k| k.starts_with(LOG_PREFIX))
    }
}

/// Validate a settings mapping, recording warnings into `warnings`.
///
/// A structural mismatch stops here; the field rules only run once the
/// mapping shape can be trusted.
pub fn validate_settings(
    grammar: &Grammar,
    syntax: &dyn SyntaxChecker,
    value: &Value,
    warnings: &mut Warnings,
) -> PlaybookResult<Settings> {
    grammar.validate(NodeKind::Settings, value)?;

    let settings: Settings = serde_json::from_value(value.clone())
        .map_err(|e| PlaybookError::Structure(format!("settings: {}", e)))?;

    if let Some(ref cron) = settings.cron {
        syntax
            .check_cron(cron)
            .map_err(|e| PlaybookError::Settings(format!("invalid cron '{}': {}", cron, e)))?;
    }

    if settings.name.is_none() {
        warnings.push(PlaybookWarning::MissingName);
    }

    if settings.is_scheduled() && !settings.has_notification_channel() {
        warnings.push(PlaybookWarning::NoLogMonitor);
    }

    if let (Some(timeout), Some(command_timeout)) = (settings.timeout, settings.command_timeout) {
        if timeout < command_timeout {
            return Err(PlaybookError::Settings(format!(
                "timeout ({}s) is shorter than commandTimeout ({}s)",
                timeout, command_timeout
            )));
        }
    }

    tracing::debug!(
        name = settings.name.as_deref().unwrap_or("<unnamed>"),
        scheduled = settings.is_scheduled(),
        "Settings validated"
    );

    Ok(settings)
}
