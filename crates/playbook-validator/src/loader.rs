//! Playbook loading from YAML or JSON text.
//!
//! JSON documents are valid YAML, so one parser covers both. Mapping order
//! from the source text is preserved, which placeholder resolution relies on.

use std::path::Path;

use serde_json::Value;

use crate::error::{PlaybookError, PlaybookResult};

/// Parse playbook text into a document tree.
pub fn load_str(content: &str) -> PlaybookResult<Value> {
    let value: Value = serde_yaml::from_str(content)?;
    Ok(value)
}

/// Read and parse a playbook file.
pub fn load_file(path: impl AsRef<Path>) -> PlaybookResult<Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| PlaybookError::Io(format!("{}: {}", path.display(), e)))?;
    load_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_yaml_keeps_order() {
        let yaml = r#"
cmd:
  - echo ${{input}}
input:
  - ["dummy"]
"#;
        let value = load_str(yaml).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["cmd", "input"]);
    }

    #[test]
    fn test_load_json_text() {
        let value = load_str(r#"{"cmd": ["echo"], "assertReturnCode": 0}"#).unwrap();
        assert_eq!(value["assertReturnCode"], 0);
    }

    #[test]
    fn test_parse_error() {
        let err = load_str("cmd: [unclosed").unwrap_err();
        assert!(matches!(err, PlaybookError::Parse(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tests:\n  run:\n    - make test\n  assertReturnCode: 0").unwrap();

        let value = load_file(file.path()).unwrap();
        assert_eq!(value["tests"]["run"][0], "make test");
    }

    #[test]
    fn test_missing_file() {
        let err = load_file("/nonexistent/playbook.yml").unwrap_err();
        assert!(matches!(err, PlaybookError::Io(_)));
    }
}
