//! Playbook Validator Library
//!
//! Pre-flight checks for playbooks: nested documents of commands, inputs,
//! assertions and scheduling settings. Validation catches structural errors
//! (wrong shapes) and semantic errors (undefined or misplaced variable
//! references, missing executions, inconsistent settings) before any command
//! runs.
//!
//! ## Modules
//!
//! - [`grammar`]: Structural grammars per node kind
//! - [`settings`]: Root settings shape and cross-field rules
//! - [`tree`]: Scope tree built beside the document
//! - [`walker`]: Execution/assertion policy walk
//! - [`resolver`]: Placeholder resolution against enclosing scopes
//! - [`validator`]: Entry point tying the stages together
//! - [`loader`]: YAML/JSON loading
//! - [`config`]: CLI configuration from environment variables
//!
//! ## Example
//!
//! ```ignore
//! use playbook_validator::{load_str, Validator};
//!
//! let playbook = load_str(r#"
//! hosts:
//!   - ["example.com"]
//! ping:
//!   - ping -c1 ${{hosts}}
//! assertReturnCode: 0
//! "#)?;
//!
//! let validator = Validator::new()?;
//! let report = validator.validate(&playbook);
//! for warning in &report.warnings {
//!     println!("{warning}");
//! }
//! report.into_result()?;
//! ```

pub mod config;
pub mod error;
pub mod grammar;
pub mod loader;
pub mod placeholder;
pub mod resolver;
pub mod result_ext;
pub mod settings;
pub mod syntax;
pub mod tree;
pub mod validator;
pub mod walker;
pub mod warning;

use serde_json::Value;

pub use config::{LogFormat, ValidatorConfig};
pub use error::{PlaybookError, PlaybookResult};
pub use grammar::{Grammar, NodeKind};
pub use loader::{load_file, load_str};
pub use result_ext::ResultExt;
pub use settings::Settings;
pub use syntax::{DefaultSyntax, SyntaxChecker};
pub use validator::{validate_playbook, ValidationReport, Validator};
pub use warning::{PlaybookWarning, Warnings};

/// Compile the grammars once per process for the helpers below.
fn shared_grammar() -> PlaybookResult<&'static Grammar> {
    static GRAMMAR: once_cell::sync::OnceCell<Grammar> = once_cell::sync::OnceCell::new();
    GRAMMAR.get_or_try_init(Grammar::compile)
}

/// Whether `value` is shaped like a command group.
pub fn is_command_group(value: &Value) -> bool {
    is_kind(NodeKind::Command, value)
}

/// Whether `value` is shaped like an input group.
pub fn is_input_group(value: &Value) -> bool {
    is_kind(NodeKind::Input, value)
}

pub fn is_import_group(value: &Value) -> bool {
    is_kind(NodeKind::Import, value)
}

pub fn is_settings_shape(value: &Value) -> bool {
    is_kind(NodeKind::Settings, value)
}

pub fn is_test_shape(value: &Value) -> bool {
    is_kind(NodeKind::Test, value)
}

/// Check a command group, reporting the first grammar mismatch.
pub fn validate_command_group(value: &Value) -> PlaybookResult<()> {
    shared_grammar()?.validate(NodeKind::Command, value)
}

/// Check an input group, reporting the first grammar mismatch.
pub fn validate_input_group(value: &Value) -> PlaybookResult<()> {
    shared_grammar()?.validate(NodeKind::Input, value)
}

pub fn validate_import_group(value: &Value) -> PlaybookResult<()> {
    shared_grammar()?.validate(NodeKind::Import, value)
}

/// Shape-only settings check; see [`settings::validate_settings`] for the field rules.
pub fn validate_settings_shape(value: &Value) -> PlaybookResult<()> {
    shared_grammar()?.validate(NodeKind::Settings, value)
}

/// Shape-only document check, without settings handling or policy.
pub fn validate_test_shape(value: &Value) -> PlaybookResult<()> {
    shared_grammar()?.validate(NodeKind::Test, value)
}

fn is_kind(kind: NodeKind, value: &Value) -> bool {
    shared_grammar()
        .map(|grammar| grammar.is_valid(kind, value))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_input() {
        assert!(validate_input_group(&json!([["1", "2"]])).is_ok());
        assert!(is_input_group(&json!([["1"]])));
    }

    #[test]
    fn test_is_command() {
        assert!(validate_command_group(&json!(["1", "2"])).is_ok());
        assert!(!is_command_group(&json!([["1", "2"]])));
    }

    #[test]
    fn test_other_kinds() {
        assert!(is_import_group(&json!(["satori://base.yml"])));
        assert!(is_settings_shape(&json!({"name": "n"})));
        assert!(validate_settings_shape(&json!({"bogus": 1})).is_err());
        assert!(is_test_shape(&json!({"cmd": ["echo"]})));
        assert!(validate_import_group(&json!(["echo"])).is_err());
        assert!(validate_test_shape(&json!({"cmd": 3})).is_err());
    }

    #[test]
    fn test_load_and_validate_yaml() {
        let playbook = load_str(
            r#"
settings:
  name: http smoke
  cron: "*/5 * * * *"
  logOnFail: slack
hosts:
  - ["example.com", "public"]
ping:
  run:
    - curl -sf https://${{hosts}}/health
  assertReturnCode: 0
"#,
        )
        .unwrap();

        let validator = Validator::new().unwrap();
        let report = validator.validate(&playbook);
        assert!(report.is_valid(), "{:?}", report.outcome);
        assert!(report.warnings.is_empty());
    }
}
