//! Execution and assertion policy over the scope tree.
//!
//! The walker visits every leaf once, depth-first in document order, and
//! classifies it as an assertion, a command group, or neither. Command
//! groups are checked for shell syntax and have their placeholders
//! resolved. Afterwards the playbook must contain at least one execution;
//! a playbook without assertions is accepted with a warning.

use serde_json::Value;

use crate::error::{PlaybookError, PlaybookResult};
use crate::grammar::{Grammar, NodeKind};
use crate::resolver::ReferenceResolver;
use crate::syntax::SyntaxChecker;
use crate::tree::{ScopeId, ScopeTree};
use crate::warning::{PlaybookWarning, Warnings};

/// Prefix that marks a key as an assertion (`assertReturnCode`, ...).
pub const ASSERTION_PREFIX: &str = "assert";

/// Counts gathered during a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub executions: usize,
    pub assertions: usize,
}

pub fn is_assertion_key(key: &str) -> bool {
    key.starts_with(ASSERTION_PREFIX)
}

/// Depth-first policy walker.
pub struct PolicyWalker<'g, 't, 'a> {
    grammar: &'g Grammar,
    syntax: &'g dyn SyntaxChecker,
    tree: &'t ScopeTree<'a>,
}

impl<'g, 't, 'a> PolicyWalker<'g, 't, 'a> {
    pub fn new(grammar: &'g Grammar, syntax: &'g dyn SyntaxChecker, tree: &'t ScopeTree<'a>) -> Self {
        Self {
            grammar,
            syntax,
            tree,
        }
    }

    /// Walk the whole tree, stopping at the first fatal finding.
    pub fn walk(&self, warnings: &mut Warnings) -> PlaybookResult<WalkSummary> {
        let resolver = ReferenceResolver::new(self.grammar, self.tree);
        let mut summary = WalkSummary::default();

        let root = self.tree.root();
        let mut stack = vec![(root, self.tree.scope(root).entries.iter())];

        while let Some((scope, entries)) = stack.last_mut() {
            let scope = *scope;
            let Some((key, value)) = entries.next() else {
                stack.pop();
                continue;
            };

            if value.is_object() {
                if let Some(child) = self.tree.child(scope, key) {
                    stack.push((child, self.tree.scope(child).entries.iter()));
                }
            } else if is_assertion_key(key) {
                summary.assertions += 1;
            } else if self.grammar.is_valid(NodeKind::Command, value) {
                summary.executions += 1;
                self.check_commands(scope, key, value)?;
                resolver.resolve(scope, key)?;
            }
        }

        if summary.executions == 0 {
            return Err(PlaybookError::NoExecutions);
        }
        if summary.assertions == 0 {
            warnings.push(PlaybookWarning::MissingAssertions);
        }

        tracing::debug!(
            executions = summary.executions,
            assertions = summary.assertions,
            "Policy walk complete"
        );
        Ok(summary)
    }

    fn check_commands(&self, scope: ScopeId, key: &str, group: &Value) -> PlaybookResult<()> {
        let commands = group.as_array().map(Vec::as_slice).unwrap_or_default();
        for command in commands.iter().filter_map(Value::as_str) {
            if let Err(reason) = self.syntax.check_command(command) {
                tracing::debug!(
                    scope = %self.tree.path(scope),
                    key,
                    "Command is not valid shell"
                );
                return Err(PlaybookError::InvalidCommand {
                    command: command.to_string(),
                    reason,
                });
            }
        }
        Ok(())
    }
}
