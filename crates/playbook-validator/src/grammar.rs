//! Structural grammars for playbook nodes.
//!
//! Each node kind has a JSON Schema shipped with the crate. The grammars are
//! compiled once and are read-only afterwards, so one [`Grammar`] can be
//! shared by any number of validation calls.

use jsonschema::Draft;
use serde_json::Value;

use crate::error::{PlaybookError, PlaybookResult};

const COMMAND_SCHEMA: &str = include_str!("../schemas/command.json");
const INPUT_SCHEMA: &str = include_str!("../schemas/input.json");
const IMPORT_SCHEMA: &str = include_str!("../schemas/import.json");
const SETTINGS_SCHEMA: &str = include_str!("../schemas/settings.json");
const TEST_SCHEMA: &str = include_str!("../schemas/test.json");

/// Node kinds with a structural grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Command,
    Input,
    Import,
    Settings,
    Test,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Command => "command group",
            NodeKind::Input => "input group",
            NodeKind::Import => "import group",
            NodeKind::Settings => "settings",
            NodeKind::Test => "test",
        }
    }
}

/// Compiled grammars for every node kind.
pub struct Grammar {
    command: jsonschema::Validator,
    input: jsonschema::Validator,
    import: jsonschema::Validator,
    settings: jsonschema::Validator,
    test: jsonschema::Validator,
}

impl Grammar {
    /// Compile the shipped grammars.
    ///
    /// The test grammar references the leaf grammars through local
    /// `definitions`, which are filled in here before compilation.
    pub fn compile() -> PlaybookResult<Self> {
        let command = parse_schema(NodeKind::Command, COMMAND_SCHEMA)?;
        let input = parse_schema(NodeKind::Input, INPUT_SCHEMA)?;
        let import = parse_schema(NodeKind::Import, IMPORT_SCHEMA)?;
        let settings = parse_schema(NodeKind::Settings, SETTINGS_SCHEMA)?;
        let mut test = parse_schema(NodeKind::Test, TEST_SCHEMA)?;

        let definitions = test
            .get_mut("definitions")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| {
                PlaybookError::Grammar("test grammar has no 'definitions' object".to_string())
            })?;
        definitions.insert("command".to_string(), command.clone());
        definitions.insert("input".to_string(), input.clone());
        definitions.insert("import".to_string(), import.clone());

        Ok(Self {
            command: build(NodeKind::Command, &command)?,
            input: build(NodeKind::Input, &input)?,
            import: build(NodeKind::Import, &import)?,
            settings: build(NodeKind::Settings, &settings)?,
            test: build(NodeKind::Test, &test)?,
        })
    }

    fn validator(&self, kind: NodeKind) -> &jsonschema::Validator {
        match kind {
            NodeKind::Command => &self.command,
            NodeKind::Input => &self.input,
            NodeKind::Import => &self.import,
            NodeKind::Settings => &self.settings,
            NodeKind::Test => &self.test,
        }
    }

    /// Whether `value` is shaped like a `kind` node.
    pub fn is_valid(&self, kind: NodeKind, value: &Value) -> bool {
        self.validator(kind).is_valid(value)
    }

    /// Check `value` against the `kind` grammar, surfacing the first mismatch.
    pub fn validate(&self, kind: NodeKind, value: &Value) -> PlaybookResult<()> {
        match self.validator(kind).iter_errors(value).next() {
            None => Ok(()),
            Some(err) => Err(PlaybookError::Structure(err.to_string())),
        }
    }
}

fn parse_schema(kind: NodeKind, source: &str) -> PlaybookResult<Value> {
    serde_json::from_str(source).map_err(|e| {
        PlaybookError::Grammar(format!("{} grammar is not valid JSON: {}", kind.as_str(), e))
    })
}

fn build(kind: NodeKind, schema: &Value) -> PlaybookResult<jsonschema::Validator> {
    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(schema)
        .map_err(|e| PlaybookError::Grammar(format!("{} grammar: {}", kind.as_str(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grammar() -> Grammar {
        Grammar::compile().unwrap()
    }

    #[test]
    fn test_command_group_shape() {
        let g = grammar();
        assert!(g.is_valid(NodeKind::Command, &json!(["1", "2"])));
        assert!(g.is_valid(NodeKind::Command, &json!(["echo ${{name}}"])));
        assert!(!g.is_valid(NodeKind::Command, &json!([])));
        assert!(!g.is_valid(NodeKind::Command, &json!([["echo"]])));
        assert!(!g.is_valid(NodeKind::Command, &json!("echo")));
        assert!(!g.is_valid(NodeKind::Command, &json!(["satori://other.yml"])));
    }

    #[test]
    fn test_input_group_shape() {
        let g = grammar();
        assert!(g.is_valid(NodeKind::Input, &json!([["1", "2"]])));
        assert!(g.is_valid(NodeKind::Input, &json!([["dummy"], [42, "answer"]])));
        assert!(!g.is_valid(NodeKind::Input, &json!(["1"])));
        assert!(!g.is_valid(NodeKind::Input, &json!([["a", "b", "c"]])));
        assert!(!g.is_valid(NodeKind::Input, &json!([[]])));
    }

    #[test]
    fn test_import_group_shape() {
        let g = grammar();
        assert!(g.is_valid(NodeKind::Import, &json!(["satori://tests/base.yml"])));
        assert!(!g.is_valid(NodeKind::Import, &json!(["tests/base.yml"])));
    }

    #[test]
    fn test_settings_shape() {
        let g = grammar();
        assert!(g.is_valid(NodeKind::Settings, &json!({"name": "nightly"})));
        assert!(g.is_valid(
            NodeKind::Settings,
            &json!({"rate": "5 minutes", "logOnFail": "slack"})
        ));
        assert!(!g.is_valid(NodeKind::Settings, &json!({})));
        assert!(!g.is_valid(NodeKind::Settings, &json!({"colour": "red"})));
        assert!(!g.is_valid(NodeKind::Settings, &json!({"timeout": "soon"})));
        assert!(!g.is_valid(NodeKind::Settings, &json!({"rate": "often"})));
    }

    #[test]
    fn test_document_shape() {
        let g = grammar();
        let doc = json!({
            "install": ["apt-get install -y curl"],
            "tests": {
                "urls": [["https://example.com"]],
                "fetch": {
                    "run": ["curl ${{urls}}"],
                    "assertReturnCode": 0
                }
            },
            "import": ["satori://base.yml"]
        });
        assert!(g.validate(NodeKind::Test, &doc).is_ok());

        let bad = json!({"tests": {"run": 42}});
        let err = g.validate(NodeKind::Test, &bad).unwrap_err();
        assert!(matches!(err, PlaybookError::Structure(_)));
    }

    #[test]
    fn test_document_rejects_odd_keys_and_assertion_mappings() {
        let g = grammar();
        assert!(!g.is_valid(NodeKind::Test, &json!({"bad key": ["echo"]})));
        assert!(!g.is_valid(NodeKind::Test, &json!({"assertStdout": {"nested": ["echo"]}})));
    }
}
