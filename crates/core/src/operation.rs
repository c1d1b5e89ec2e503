use std::fmt;

use serde::Serialize;

/// The kind of Database Service call an error or log line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    Get,
    Query,
    Put,
    Delete,
    WriteTransaction,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Get => "get",
            OperationKind::Query => "query",
            OperationKind::Put => "put",
            OperationKind::Delete => "delete",
            OperationKind::WriteTransaction => "write-transaction",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_kind_display() {
        assert_eq!(OperationKind::Get.to_string(), "get");
        assert_eq!(OperationKind::Query.to_string(), "query");
        assert_eq!(OperationKind::Put.to_string(), "put");
        assert_eq!(OperationKind::Delete.to_string(), "delete");
        assert_eq!(
            OperationKind::WriteTransaction.to_string(),
            "write-transaction"
        );
    }

    #[test]
    fn test_operation_kind_serializes_like_display() {
        let json = serde_json::to_value(OperationKind::WriteTransaction).unwrap();
        assert_eq!(json, serde_json::json!("write-transaction"));
    }
}
