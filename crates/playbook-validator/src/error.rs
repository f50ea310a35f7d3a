//! Error types for playbook validation.
//!
//! Every variant is terminal for the current validation call. The variants
//! fall into two families: validation errors (the document or a subtree has
//! the wrong shape or inconsistent settings) and variable errors (a
//! placeholder could not be bound to an input definition).

use std::collections::BTreeSet;

use thiserror::Error;

/// Errors raised while loading or validating a playbook.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybookError {
    /// Document or subtree does not match its grammar
    #[error("Invalid playbook structure: {0}")]
    Structure(String),

    /// Settings are well-formed but semantically inconsistent
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// A command string cannot be split as a shell command
    #[error("Invalid command '{command}': {reason}")]
    InvalidCommand { command: String, reason: String },

    /// No command group anywhere in the tree
    #[error("Every playbook must define at least one execution")]
    NoExecutions,

    /// Placeholders with no visible input definition
    #[error("Can't resolve variables: {}", join_names(.names))]
    UnresolvedReference { names: BTreeSet<String> },

    /// The document root is not a mapping
    #[error("Playbook must be a mapping")]
    NotAMapping,

    /// YAML/JSON text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error while reading a playbook file
    #[error("I/O error: {0}")]
    Io(String),

    /// A shipped grammar failed to compile
    #[error("Grammar error: {0}")]
    Grammar(String),
}

/// Result type alias using PlaybookError.
pub type PlaybookResult<T> = Result<T, PlaybookError>;

impl PlaybookError {
    /// True for shape and settings failures, including the execution policy.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            PlaybookError::Structure(_)
                | PlaybookError::Settings(_)
                | PlaybookError::InvalidCommand { .. }
                | PlaybookError::NoExecutions
                | PlaybookError::NotAMapping
        )
    }

    /// True when a placeholder could not be bound.
    pub fn is_variable_error(&self) -> bool {
        matches!(self, PlaybookError::UnresolvedReference { .. })
    }

    /// Names of the placeholders that failed to resolve, if any.
    pub fn unresolved_names(&self) -> Option<&BTreeSet<String>> {
        match self {
            PlaybookError::UnresolvedReference { names } => Some(names),
            _ => None,
        }
    }
}

fn join_names(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl From<std::io::Error> for PlaybookError {
    fn from(e: std::io::Error) -> Self {
        PlaybookError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for PlaybookError {
    fn from(e: serde_yaml::Error) -> Self {
        PlaybookError::Parse(e.to_string())
    }
}
