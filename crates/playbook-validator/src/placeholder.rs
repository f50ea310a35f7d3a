//! Placeholder extraction from command templates.
//!
//! Placeholders are written `${{identifier}}`. The delimiters are part of
//! the playbook format and must stay stable for existing playbooks.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{\{([A-Za-z0-9_-]+)\}\}").expect("placeholder pattern is a valid regex")
});

/// Identifiers referenced by a single command string, in order of appearance.
pub fn references(command: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(command)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Union of identifiers referenced anywhere in a command group.
///
/// Non-string entries are skipped; the group has already passed the
/// command grammar by the time this runs.
pub fn group_references(commands: &[Value]) -> BTreeSet<&str> {
    commands
        .iter()
        .filter_map(Value::as_str)
        .flat_map(|command| references(command))
        .collect()
}
