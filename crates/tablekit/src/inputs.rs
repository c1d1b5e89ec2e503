//! Caller-facing inputs for the single-item operations and transactions.
//!
//! A `PutInput` or `DeleteInput` works both for a direct call and for queuing
//! into a transaction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tablekit_core::{
    DeleteRequest, Document, Error, GetRequest, ProjectionSpec, PutRequest, QueryRequest, Result,
};

/// Converts any serializable object into a `Document`.
///
/// Fails with `Error::Serialization` when the value is not a JSON object.
pub fn to_document(value: &impl Serialize) -> Result<Document> {
    match serde_json::to_value(value).map_err(|e| Error::Serialization(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Serialization(format!(
            "expected an object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read options for `get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetConditions {
    /// Strongly consistent read when `true`. Not supported on global secondary indexes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
}

/// Condition under which a put is allowed to happen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutConditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Document>,
}

/// Condition under which a delete is allowed to happen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteConditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Document>,
}

/// Key condition and paging options for `query`.
///
/// There is no filter expression, so the scanned count always equals the
/// returned count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryConditions {
    /// Local or global secondary index to query instead of the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    /// Maximum number of items to evaluate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
    /// Ascending sort key order when `true` or unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_index_forward: Option<bool>,
    /// `LastEvaluatedKey` of the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_start_key: Option<Document>,
    /// e.g. `u = :registrationNumber` or `pk = :pk AND begins_with(sk, :prefix)`.
    pub key_condition_expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_attribute_values: Option<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetInput {
    pub table_name: String,
    pub key: Document,
    pub attributes_to_retrieve_in_query: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_conditions: Option<GetConditions>,
}

impl GetInput {
    pub fn new<S: Into<String>>(
        table_name: impl Into<String>,
        key: Document,
        attributes: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            attributes_to_retrieve_in_query: attributes.into_iter().map(Into::into).collect(),
            get_conditions: None,
        }
    }

    pub fn with_conditions(mut self, conditions: GetConditions) -> Self {
        self.get_conditions = Some(conditions);
        self
    }

    pub fn to_request(&self) -> GetRequest {
        let (projection_expression, expression_attribute_names) =
            projection_parts(&self.attributes_to_retrieve_in_query);

        GetRequest {
            table_name: self.table_name.clone(),
            key: self.key.clone(),
            consistent_read: self
                .get_conditions
                .as_ref()
                .and_then(|conditions| conditions.consistent_read),
            projection_expression,
            expression_attribute_names,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutInput {
    pub table_name: String,
    pub item: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_conditions: Option<PutConditions>,
}

impl PutInput {
    pub fn new(table_name: impl Into<String>, item: Document) -> Self {
        Self {
            table_name: table_name.into(),
            item,
            put_conditions: None,
        }
    }

    pub fn with_conditions(mut self, conditions: PutConditions) -> Self {
        self.put_conditions = Some(conditions);
        self
    }

    pub fn to_request(&self) -> PutRequest {
        let conditions = self.put_conditions.clone().unwrap_or_default();
        PutRequest {
            table_name: self.table_name.clone(),
            item: self.item.clone(),
            condition_expression: conditions.condition_expression,
            expression_attribute_values: conditions.expression_attribute_values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteInput {
    pub table_name: String,
    pub key: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_conditions: Option<DeleteConditions>,
}

impl DeleteInput {
    pub fn new(table_name: impl Into<String>, key: Document) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            delete_conditions: None,
        }
    }

    pub fn with_conditions(mut self, conditions: DeleteConditions) -> Self {
        self.delete_conditions = Some(conditions);
        self
    }

    pub fn to_request(&self) -> DeleteRequest {
        let conditions = self.delete_conditions.clone().unwrap_or_default();
        DeleteRequest {
            table_name: self.table_name.clone(),
            key: self.key.clone(),
            condition_expression: conditions.condition_expression,
            expression_attribute_values: conditions.expression_attribute_values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInput {
    pub table_name: String,
    pub attributes_to_retrieve_in_query: Vec<String>,
    pub query_conditions: QueryConditions,
}

impl QueryInput {
    pub fn new<S: Into<String>>(
        table_name: impl Into<String>,
        conditions: QueryConditions,
        attributes: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            attributes_to_retrieve_in_query: attributes.into_iter().map(Into::into).collect(),
            query_conditions: conditions,
        }
    }

    pub fn to_request(&self) -> QueryRequest {
        let (projection_expression, expression_attribute_names) =
            projection_parts(&self.attributes_to_retrieve_in_query);
        let conditions = self.query_conditions.clone();

        QueryRequest {
            table_name: self.table_name.clone(),
            index_name: conditions.index_name,
            limit: conditions.limit,
            consistent_read: conditions.consistent_read,
            scan_index_forward: conditions.scan_index_forward,
            exclusive_start_key: conditions.exclusive_start_key,
            projection_expression,
            expression_attribute_names,
            key_condition_expression: Some(conditions.key_condition_expression),
            expression_attribute_values: conditions.expression_attribute_values,
        }
    }
}

/// Splits a projection into the two request fields, omitting both when no
/// attribute was requested (the service rejects an empty name map).
fn projection_parts(
    attributes: &[String],
) -> (
    Option<String>,
    Option<std::collections::BTreeMap<String, String>>,
) {
    let projection = ProjectionSpec::new(attributes);
    if projection.is_empty() {
        return (None, None);
    }
    (
        Some(projection.expression().to_string()),
        Some(projection.names_map()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        to_document(&value).unwrap()
    }

    #[test]
    fn test_to_document_rejects_non_objects() {
        assert!(to_document(&json!({ "id": 1 })).is_ok());
        let err = to_document(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(
            err.to_string(),
            "Serialization error: expected an object, found an array"
        );
    }

    #[test]
    fn test_get_input_builds_prefixed_projection() {
        let input = GetInput::new(
            "spaceship",
            doc(json!({ "u": "__REG_NUMBER_FOUND__" })),
            ["u", "registration_number", "name", "max_weight", "max_passengers"],
        );
        let request = input.to_request();

        assert_eq!(request.table_name, "spaceship");
        assert_eq!(
            request.projection_expression.as_deref(),
            Some("#u,#registration_number,#name,#max_weight,#max_passengers")
        );
        let names = request.expression_attribute_names.unwrap();
        assert_eq!(names["#u"], "u");
        assert_eq!(names["#max_passengers"], "max_passengers");
        assert_eq!(names.len(), 5);
        assert_eq!(request.consistent_read, None);
    }

    #[test]
    fn test_get_input_without_attributes_has_no_projection() {
        let request = GetInput::new("spaceship", doc(json!({ "u": "x" })), Vec::<String>::new())
            .with_conditions(GetConditions {
                consistent_read: Some(true),
            })
            .to_request();

        assert!(request.projection_expression.is_none());
        assert!(request.expression_attribute_names.is_none());
        assert_eq!(request.consistent_read, Some(true));
    }

    #[test]
    fn test_put_input_carries_conditions() {
        let request = PutInput::new("spaceships", doc(json!({ "id": 821, "fuel": 9000 })))
            .with_conditions(PutConditions {
                condition_expression: Some("attribute_not_exists(id)".to_string()),
                expression_attribute_values: None,
            })
            .to_request();

        assert_eq!(
            request.condition_expression.as_deref(),
            Some("attribute_not_exists(id)")
        );
        assert_eq!(request.item["fuel"], 9000);
    }

    #[test]
    fn test_query_input_keeps_caller_conditions() {
        let input = QueryInput::new(
            "spaceship",
            QueryConditions {
                index_name: Some("max_weight_gsi".to_string()),
                key_condition_expression: "max_weight > :max_weight".to_string(),
                expression_attribute_values: Some(doc(json!({ ":max_weight": "800" }))),
                limit: Some(10),
                ..Default::default()
            },
            ["u", "name"],
        );
        let request = input.to_request();

        assert_eq!(request.index_name.as_deref(), Some("max_weight_gsi"));
        assert_eq!(request.limit, Some(10));
        assert_eq!(
            request.key_condition_expression.as_deref(),
            Some("max_weight > :max_weight")
        );
        assert_eq!(request.projection_expression.as_deref(), Some("#u,#name"));
    }

    #[test]
    fn test_inputs_serialize_for_diagnostics() {
        let input = DeleteInput::new("cargo-to-spaceship", doc(json!({ "p": "SOIL", "s": 821 })));
        let value = serde_json::to_value(&input).unwrap();

        assert_eq!(value["tableName"], "cargo-to-spaceship");
        assert_eq!(value["key"]["s"], 821);
        assert!(value.get("deleteConditions").is_none());
    }
}
