//! Syntax predicates for cron expressions and shell commands.
//!
//! The validator only needs a pass/fail answer (plus a message) from these
//! checks, so they sit behind [`SyntaxChecker`] and can be replaced.

use std::str::FromStr;

/// Pass/fail syntax checks consumed by the validator.
pub trait SyntaxChecker: Send + Sync {
    /// Check a cron schedule expression.
    fn check_cron(&self, expression: &str) -> Result<(), String>;

    /// Check that a command string can be split into shell words.
    fn check_command(&self, command: &str) -> Result<(), String>;
}

/// Default checks backed by the `cron` and `shell-words` crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSyntax;

impl SyntaxChecker for DefaultSyntax {
    fn check_cron(&self, expression: &str) -> Result<(), String> {
        // The cron crate wants a seconds field; classic five-field
        // expressions run on the minute.
        let normalized = if expression.split_whitespace().count() == 5 {
            format!("0 {}", expression.trim())
        } else {
            expression.trim().to_string()
        };

        cron::Schedule::from_str(&normalized)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn check_command(&self, command: &str) -> Result<(), String> {
        shell_words::split(command)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
