//! Request and response shapes exchanged with the Database Service.
//!
//! Field names serialize in the service's own PascalCase so that logged and
//! recorded requests read like the wire payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A weakly typed item, key, or value map: attribute name to JSON value.
pub type Document = serde_json::Map<String, Value>;

/// Maximum number of write intents the service accepts in one transaction.
pub const MAX_TRANSACT_ITEMS: usize = 25;

/// Capacity units consumed by a single request against one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumedCapacity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetRequest {
    pub table_name: String,
    pub key: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    pub table_name: String,
    pub item: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    pub table_name: String,
    pub key: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryRequest {
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_index_forward: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_names: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Document>,
}

/// One queued write inside a transaction.
///
/// Serializes externally tagged, `{"Put": {...}}` or `{"Delete": {...}}`,
/// which is the shape of a `TransactItems` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WriteIntent {
    Put(PutRequest),
    Delete(DeleteRequest),
}

impl WriteIntent {
    pub fn table_name(&self) -> &str {
        match self {
            WriteIntent::Put(put) => &put.table_name,
            WriteIntent::Delete(delete) => &delete.table_name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WriteIntent::Put(_) => "Put",
            WriteIntent::Delete(_) => "Delete",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactWriteRequest {
    pub transact_items: Vec<WriteIntent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

/// Response to a put or delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResponse {
    pub items: Vec<Document>,
    pub count: i32,
    pub scanned_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<Document>,
}

/// Response to a transactional write; one capacity entry per table touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactWriteResponse {
    pub consumed_capacity: Vec<ConsumedCapacity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_write_intent_serializes_externally_tagged() {
        let put = WriteIntent::Put(PutRequest {
            table_name: "spaceships".to_string(),
            item: doc(json!({ "id": 821 })),
            ..Default::default()
        });
        let delete = WriteIntent::Delete(DeleteRequest {
            table_name: "cargo-to-spaceship".to_string(),
            key: doc(json!({ "p": "SOIL" })),
            condition_expression: Some("attribute_exists(p)".to_string()),
            ..Default::default()
        });

        assert_eq!(
            serde_json::to_value(&put).unwrap(),
            json!({ "Put": { "TableName": "spaceships", "Item": { "id": 821 } } })
        );
        assert_eq!(
            serde_json::to_value(&delete).unwrap(),
            json!({
                "Delete": {
                    "TableName": "cargo-to-spaceship",
                    "Key": { "p": "SOIL" },
                    "ConditionExpression": "attribute_exists(p)"
                }
            })
        );
    }

    #[test]
    fn test_write_intent_parses_from_wire_shape() {
        let intents: Vec<WriteIntent> = serde_json::from_value(json!([
            { "Put": { "TableName": "spaceport", "Item": { "spaceships": [{ "id": 821 }] } } },
            { "Delete": { "TableName": "cargo", "Key": { "p": "SOIL", "s": 821 } } }
        ]))
        .unwrap();

        assert_eq!(intents.len(), 2);
        assert_eq!(intents[0].kind(), "Put");
        assert_eq!(intents[0].table_name(), "spaceport");
        assert_eq!(intents[1].kind(), "Delete");
        assert_eq!(intents[1].table_name(), "cargo");
    }

    #[test]
    fn test_consumed_capacity_skips_missing_fields() {
        let capacity = ConsumedCapacity {
            table_name: Some("spaceships".to_string()),
            capacity_units: Some(1.0),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&capacity).unwrap(),
            json!({ "TableName": "spaceships", "CapacityUnits": 1.0 })
        );
    }
}
