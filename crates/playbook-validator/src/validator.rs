//! Validation entry point.
//!
//! Stages, in order:
//! 1. settings (shape, then field rules)
//! 2. whole-document shape, with settings removed
//! 3. scope tree annotation
//! 4. policy walk, resolving placeholders as command groups are found
//!
//! The first fatal error ends the call. Warnings raised before it are kept
//! in the returned [`ValidationReport`].

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::error::{PlaybookError, PlaybookResult};
use crate::grammar::{Grammar, NodeKind};
use crate::settings::{validate_settings, SETTINGS_KEY};
use crate::syntax::{DefaultSyntax, SyntaxChecker};
use crate::tree::ScopeTree;
use crate::walker::PolicyWalker;
use crate::warning::{PlaybookWarning, Warnings};

/// Outcome of one validation call plus every warning raised during it.
#[derive(Debug)]
pub struct ValidationReport<'d> {
    /// The caller's document on success, untouched.
    pub outcome: PlaybookResult<&'d Value>,
    pub warnings: Vec<PlaybookWarning>,
}

impl<'d> ValidationReport<'d> {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&PlaybookError> {
        self.outcome.as_ref().err()
    }

    /// Drop the warnings and keep only the outcome.
    pub fn into_result(self) -> PlaybookResult<&'d Value> {
        self.outcome
    }
}

/// Playbook validator holding compiled grammars and syntax checks.
///
/// Immutable after construction; share one instance across threads.
pub struct Validator {
    grammar: Grammar,
    syntax: Box<dyn SyntaxChecker>,
}

impl Validator {
    /// Create a validator with the default cron and shell checks.
    pub fn new() -> PlaybookResult<Self> {
        Self::with_syntax(DefaultSyntax)
    }

    /// Create a validator with custom syntax checks.
    pub fn with_syntax(syntax: impl SyntaxChecker + 'static) -> PlaybookResult<Self> {
        Ok(Self {
            grammar: Grammar::compile()?,
            syntax: Box::new(syntax),
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Validate `document`, returning it unchanged on success.
    pub fn validate<'d>(&self, document: &'d Value) -> ValidationReport<'d> {
        let mut warnings = Warnings::new();
        let outcome = self.run(document, &mut warnings).map(|_| document);

        if let Err(ref e) = outcome {
            tracing::debug!(error = %e, "Playbook rejected");
        }

        ValidationReport {
            outcome,
            warnings: warnings.into_vec(),
        }
    }

    fn run(&self, document: &Value, warnings: &mut Warnings) -> PlaybookResult<()> {
        let mut working = match document {
            Value::Object(map) => map.clone(),
            _ => return Err(PlaybookError::NotAMapping),
        };

        if let Some(settings) = working.shift_remove(SETTINGS_KEY) {
            validate_settings(&self.grammar, self.syntax.as_ref(), &settings, warnings)?;
        }

        let working = Value::Object(working);
        self.grammar.validate(NodeKind::Test, &working)?;

        let root = working.as_object().ok_or(PlaybookError::NotAMapping)?;
        let tree = ScopeTree::annotate(root);
        PolicyWalker::new(&self.grammar, self.syntax.as_ref(), &tree).walk(warnings)?;

        Ok(())
    }
}

static SHARED: OnceCell<Validator> = OnceCell::new();

/// Validate with a process-wide validator, compiled on first use.
pub fn validate_playbook(document: &Value) -> PlaybookResult<Vec<PlaybookWarning>> {
    let validator = SHARED.get_or_try_init(Validator::new)?;
    let report = validator.validate(document);
    report.outcome.map(|_| report.warnings)
}
