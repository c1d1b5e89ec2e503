//! Transaction CLI command.

use std::path::{Path, PathBuf};

use clap::Parser;
use tablekit_core::{Error, Result, WriteIntent};

/// Execute a JSON file of put/delete intents as one transaction.
///
/// The file holds an ordered array of `{"Put": {...}}` and `{"Delete": {...}}`
/// entries, the same shape as a `TransactItems` list.
#[derive(Debug, Parser)]
pub struct TransactCommand {
    /// Path to the JSON intents file.
    pub file: PathBuf,
}

/// Reads an ordered list of write intents from `path`.
pub fn read_intents(path: &Path) -> Result<Vec<WriteIntent>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?;
    parse_intents(&raw)
}

pub fn parse_intents(raw: &str) -> Result<Vec<WriteIntent>> {
    serde_json::from_str(raw).map_err(|e| Error::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intents_keeps_order() {
        let intents = parse_intents(
            r#"[
                {"Put": {"TableName": "spaceships", "Item": {"id": 821, "fuel": 9000}}},
                {"Delete": {"TableName": "cargo-to-spaceship", "Key": {"p": "SOIL", "s": 821}}},
                {"Put": {"TableName": "cargo-to-spaceship", "Item": {"p": "SOIL", "s": 721}, "ConditionExpression": "attribute_not_exists(p)"}}
            ]"#,
        )
        .unwrap();

        let shape: Vec<(&str, &str)> = intents
            .iter()
            .map(|intent| (intent.kind(), intent.table_name()))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("Put", "spaceships"),
                ("Delete", "cargo-to-spaceship"),
                ("Put", "cargo-to-spaceship"),
            ]
        );
        let WriteIntent::Put(put) = &intents[2] else {
            panic!("expected a put");
        };
        assert_eq!(put.condition_expression.as_deref(), Some("attribute_not_exists(p)"));
    }

    #[test]
    fn test_parse_intents_rejects_unknown_kinds() {
        let err = parse_intents(r#"[{"Update": {"TableName": "t"}}]"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = read_intents(Path::new("/nonexistent/intents.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/intents.json"));
    }
}
