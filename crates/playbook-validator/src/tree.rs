//! Scope tree built over a playbook document.
//!
//! Every mapping in the document becomes a [`Scope`] that knows the key it
//! is bound to in its parent and a link to that parent. The bookkeeping
//! lives beside the document instead of inside it, so user data is never
//! touched and no key can collide with the navigation fields.

use serde_json::{Map, Value};

/// Index of a scope inside a [`ScopeTree`].
pub type ScopeId = usize;

/// A mapping node together with its position in the tree.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    /// Key under which this mapping is bound in its parent; `None` for the root.
    pub own_key: Option<&'a str>,
    /// Enclosing scope; `None` for the root.
    pub parent: Option<ScopeId>,
    /// User entries of the mapping, in document order.
    pub entries: &'a Map<String, Value>,
    children: Vec<ScopeId>,
}

/// Arena of scopes rooted at the document mapping.
#[derive(Debug, Clone)]
pub struct ScopeTree<'a> {
    scopes: Vec<Scope<'a>>,
}

impl<'a> ScopeTree<'a> {
    /// Annotate every mapping reachable from `root`.
    ///
    /// Traversal uses an explicit stack so document depth is bounded only
    /// by memory. Each mapping is visited exactly once.
    pub fn annotate(root: &'a Map<String, Value>) -> Self {
        let mut scopes = vec![Scope {
            own_key: None,
            parent: None,
            entries: root,
            children: Vec::new(),
        }];
        let mut pending: Vec<ScopeId> = vec![0];

        while let Some(id) = pending.pop() {
            let entries = scopes[id].entries;
            for (key, value) in entries {
                if let Value::Object(child) = value {
                    let child_id = scopes.len();
                    scopes.push(Scope {
                        own_key: Some(key.as_str()),
                        parent: Some(id),
                        entries: child,
                        children: Vec::new(),
                    });
                    scopes[id].children.push(child_id);
                    pending.push(child_id);
                }
            }
        }

        tracing::debug!(scopes = scopes.len(), "Scope tree annotated");
        Self { scopes }
    }

    pub fn root(&self) -> ScopeId {
        0
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope<'a> {
        &self.scopes[id]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id].parent
    }

    /// The nested scope bound to `key` inside scope `id`.
    pub fn child(&self, id: ScopeId, key: &str) -> Option<ScopeId> {
        self.scopes[id]
            .children
            .iter()
            .copied()
            .find(|&child| self.scopes[child].own_key == Some(key))
    }

    /// Scopes from `id` up to the root, innermost first.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
    }

    /// Dotted path of a scope, for log and error context.
    pub fn path(&self, id: ScopeId) -> String {
        let mut keys: Vec<&str> = self
            .ancestors(id)
            .filter_map(|scope| self.scopes[scope].own_key)
            .collect();
        keys.reverse();
        keys.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_mapping_annotated_once() {
        let doc = json!({
            "a": {"b": {"cmd": ["echo"]}, "c": {}},
            "d": ["x"],
            "e": {"f": {"g": {}}}
        });
        let tree = ScopeTree::annotate(doc.as_object().unwrap());

        // root, a, a.b, a.c, e, e.f, e.f.g
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.scope(tree.root()).own_key, None);
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn test_child_and_parent_links() {
        let doc = json!({"outer": {"inner": {"cmd": ["echo"]}}});
        let tree = ScopeTree::annotate(doc.as_object().unwrap());

        let outer = tree.child(tree.root(), "outer").unwrap();
        let inner = tree.child(outer, "inner").unwrap();

        assert_eq!(tree.scope(inner).own_key, Some("inner"));
        assert_eq!(tree.parent(inner), Some(outer));
        assert_eq!(tree.parent(outer), Some(tree.root()));
        assert!(tree.child(inner, "cmd").is_none());
        assert_eq!(tree.path(inner), "outer.inner");
        assert_eq!(tree.ancestors(inner).collect::<Vec<_>>(), vec![inner, outer, 0]);
    }

    #[test]
    fn test_document_untouched() {
        let doc = json!({"a": {"b": {}}});
        let before = doc.clone();
        let tree = ScopeTree::annotate(doc.as_object().unwrap());
        assert_eq!(tree.len(), 3);
        assert_eq!(doc, before);
    }
}
