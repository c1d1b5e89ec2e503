//! Conversions between JSON documents and DynamoDB attribute maps.
//!
//! Pure functions, testable without DynamoDB access.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::{AttributeValue, ConsumedCapacity as SdkConsumedCapacity};
use serde_dynamo::{from_item, to_item};

use tablekit_core::{ConsumedCapacity, Document, ServiceError, ServiceResult};

pub type AttributeMap = HashMap<String, AttributeValue>;

/// Error name for documents the adapter cannot translate to or from the wire format.
pub const SERIALIZATION_EXCEPTION: &str = "SerializationException";

/// Convert a document to a DynamoDB attribute map.
pub fn to_attribute_map(document: &Document) -> ServiceResult<AttributeMap> {
    to_item::<_, AttributeMap>(document)
        .map_err(|e| ServiceError::new(SERIALIZATION_EXCEPTION, e.to_string()))
}

/// Convert an optional document, e.g. expression attribute values.
pub fn to_optional_attribute_map(document: Option<&Document>) -> ServiceResult<Option<AttributeMap>> {
    document.map(to_attribute_map).transpose()
}

/// Convert a DynamoDB attribute map to a document.
pub fn from_attribute_map(item: AttributeMap) -> ServiceResult<Document> {
    from_item::<_, Document>(item)
        .map_err(|e| ServiceError::new(SERIALIZATION_EXCEPTION, e.to_string()))
}

pub fn from_optional_attribute_map(item: Option<AttributeMap>) -> ServiceResult<Option<Document>> {
    item.map(from_attribute_map).transpose()
}

pub fn to_name_map(names: Option<BTreeMap<String, String>>) -> Option<HashMap<String, String>> {
    names.map(|names| names.into_iter().collect())
}

/// Convert the SDK's consumed capacity into the crate's shape.
pub fn consumed_capacity(capacity: &SdkConsumedCapacity) -> ConsumedCapacity {
    ConsumedCapacity {
        table_name: capacity.table_name().map(str::to_string),
        capacity_units: capacity.capacity_units(),
        read_capacity_units: capacity.read_capacity_units(),
        write_capacity_units: capacity.write_capacity_units(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_document_to_attribute_map() {
        let item = to_attribute_map(&doc(json!({
            "p": "SOIL",
            "s": 721,
            "quantity": 7,
            "fragile": false,
            "spaceships": [{ "id": 821 }],
        })))
        .unwrap();

        assert_eq!(item.get("p"), Some(&AttributeValue::S("SOIL".to_string())));
        assert_eq!(item.get("s"), Some(&AttributeValue::N("721".to_string())));
        assert_eq!(item.get("fragile"), Some(&AttributeValue::Bool(false)));

        let Some(AttributeValue::L(spaceships)) = item.get("spaceships") else {
            panic!("expected a list, got {:?}", item.get("spaceships"));
        };
        let AttributeValue::M(ship) = &spaceships[0] else {
            panic!("expected a map");
        };
        assert_eq!(ship.get("id"), Some(&AttributeValue::N("821".to_string())));
    }

    #[test]
    fn test_attribute_map_to_document() {
        let mut item = AttributeMap::new();
        item.insert("u".to_string(), AttributeValue::S("__REG_NUMBER_FOUND__".to_string()));
        item.insert("max_weight".to_string(), AttributeValue::N("900".to_string()));
        item.insert("retired".to_string(), AttributeValue::Null(true));

        let document = from_attribute_map(item).unwrap();

        assert_eq!(document["u"], "__REG_NUMBER_FOUND__");
        assert_eq!(document["max_weight"], 900);
        assert_eq!(document["retired"], Value::Null);
    }

    #[test]
    fn test_optional_maps() {
        assert_eq!(to_optional_attribute_map(None).unwrap(), None);
        assert_eq!(from_optional_attribute_map(None).unwrap(), None);
        assert_eq!(to_name_map(None), None);

        let names: BTreeMap<String, String> =
            [("#u".to_string(), "u".to_string())].into_iter().collect();
        assert_eq!(to_name_map(Some(names)).unwrap()["#u"], "u");
    }

    #[test]
    fn test_consumed_capacity_conversion() {
        let sdk = SdkConsumedCapacity::builder()
            .table_name("spaceships")
            .capacity_units(2.0)
            .build();

        let capacity = consumed_capacity(&sdk);

        assert_eq!(capacity.table_name.as_deref(), Some("spaceships"));
        assert_eq!(capacity.capacity_units, Some(2.0));
        assert_eq!(capacity.read_capacity_units, None);
    }
}
