//! Placeholder resolution against enclosing scopes.
//!
//! A placeholder `${{name}}` used in a command group is bound by the
//! nearest enclosing definition, searching outward one scope at a time:
//!
//! 1. the scope itself is named `name` and defines an input anywhere in its
//!    subtree (entry order does not matter here), or
//! 2. a sibling key `name` appears *before* the point of entry into that
//!    scope and is an input group, or a mapping that contains one.
//!
//! A name that matches but does not define an input is a hard failure.
//! The search does not continue outward for any remaining name.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::{PlaybookError, PlaybookResult};
use crate::grammar::{Grammar, NodeKind};
use crate::placeholder;
use crate::tree::{ScopeId, ScopeTree};

/// Resolves the placeholders of one command group at a time.
pub struct ReferenceResolver<'g, 't, 'a> {
    grammar: &'g Grammar,
    tree: &'t ScopeTree<'a>,
}

/// Outcome of checking one candidate binding.
enum Binding {
    Defined,
    NotAnInput,
}

impl<'g, 't, 'a> ReferenceResolver<'g, 't, 'a> {
    pub fn new(grammar: &'g Grammar, tree: &'t ScopeTree<'a>) -> Self {
        Self { grammar, tree }
    }

    /// Resolve every placeholder of the command group bound to
    /// `command_key` inside `scope`.
    pub fn resolve(&self, scope: ScopeId, command_key: &str) -> PlaybookResult<()> {
        let commands = match self.tree.scope(scope).entries.get(command_key) {
            Some(Value::Array(commands)) => commands,
            _ => return Ok(()),
        };

        let referenced = placeholder::group_references(commands);
        if referenced.is_empty() {
            return Ok(());
        }

        let mut resolved: BTreeSet<&str> = BTreeSet::new();
        let mut boundary: &str = command_key;
        let mut current = Some(scope);

        'ascent: while let Some(id) = current {
            if resolved.len() == referenced.len() {
                break;
            }
            let node = self.tree.scope(id);

            // Self-reference: the scope's own name, unordered within it.
            if let Some(own_key) = node.own_key {
                if referenced.contains(own_key) && !resolved.contains(own_key) {
                    match self.subtree_binding(node.entries) {
                        Binding::Defined => {
                            resolved.insert(own_key);
                        }
                        Binding::NotAnInput => {
                            tracing::debug!(
                                variable = own_key,
                                scope = %self.tree.path(id),
                                "Scope named after variable defines no input"
                            );
                            break 'ascent;
                        }
                    }
                }
            }

            // Siblings that precede the point of entry into this scope.
            for (key, value) in node.entries {
                if key == boundary {
                    break;
                }
                let key = key.as_str();
                if !referenced.contains(key) || resolved.contains(key) {
                    continue;
                }
                match self.value_binding(value) {
                    Binding::Defined => {
                        resolved.insert(key);
                    }
                    Binding::NotAnInput => {
                        tracing::debug!(
                            variable = key,
                            scope = %self.tree.path(id),
                            "Sibling named after variable is not an input"
                        );
                        break 'ascent;
                    }
                }
            }

            if let Some(own_key) = node.own_key {
                boundary = own_key;
            }
            current = node.parent;
        }

        let unresolved: BTreeSet<String> = referenced
            .difference(&resolved)
            .map(|name| name.to_string())
            .collect();

        if unresolved.is_empty() {
            tracing::debug!(
                command = command_key,
                scope = %self.tree.path(scope),
                variables = referenced.len(),
                "Placeholders resolved"
            );
            Ok(())
        } else {
            Err(PlaybookError::UnresolvedReference { names: unresolved })
        }
    }

    fn value_binding(&self, value: &Value) -> Binding {
        if self.defines_input(value) {
            Binding::Defined
        } else {
            Binding::NotAnInput
        }
    }

    fn subtree_binding(&self, entries: &Map<String, Value>) -> Binding {
        if entries.values().any(|value| self.defines_input(value)) {
            Binding::Defined
        } else {
            Binding::NotAnInput
        }
    }

    /// Whether `value` is an input group or a mapping holding one at any depth.
    fn defines_input(&self, value: &Value) -> bool {
        let mut pending = vec![value];
        while let Some(value) = pending.pop() {
            if self.grammar.is_valid(NodeKind::Input, value) {
                return true;
            }
            if let Value::Object(entries) = value {
                pending.extend(entries.values());
            }
        }
        false
    }
}
