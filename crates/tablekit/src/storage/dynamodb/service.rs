//! DynamoDB Database Service implementation.
//!
//! Implements `DatabaseService` from `tablekit_core` using `aws-sdk-dynamodb`.
//! Every call asks for total consumed capacity.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{Delete, Put, ReturnConsumedCapacity, TransactWriteItem};
use aws_sdk_dynamodb::Client;

use tablekit_core::{
    DatabaseService, DeleteRequest, GetRequest, GetResponse, PutRequest, QueryRequest,
    QueryResponse, ServiceError, ServiceResult, TransactWriteRequest, TransactWriteResponse,
    WriteIntent, WriteResponse,
};

use super::conversions::{
    consumed_capacity, from_attribute_map, from_optional_attribute_map, to_attribute_map,
    to_name_map, to_optional_attribute_map,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_transact_write_items_error,
};
use crate::config::Config;

/// DynamoDB-based Database Service.
#[derive(Debug, Clone)]
pub struct DynamoDbService {
    client: Client,
}

impl DynamoDbService {
    /// Creates a new service with the given DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a new service from connection settings.
    ///
    /// Uses the AWS SDK default credential chain, with the region and optional
    /// endpoint override taken from `config`.
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }

    /// Get the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

fn build_error(err: impl std::fmt::Display) -> ServiceError {
    ServiceError::validation(err.to_string())
}

fn transact_item(intent: WriteIntent) -> ServiceResult<TransactWriteItem> {
    let item = match intent {
        WriteIntent::Put(put) => {
            let put = Put::builder()
                .table_name(put.table_name)
                .set_item(Some(to_attribute_map(&put.item)?))
                .set_condition_expression(put.condition_expression)
                .set_expression_attribute_values(to_optional_attribute_map(
                    put.expression_attribute_values.as_ref(),
                )?)
                .build()
                .map_err(build_error)?;
            TransactWriteItem::builder().put(put).build()
        }
        WriteIntent::Delete(delete) => {
            let delete = Delete::builder()
                .table_name(delete.table_name)
                .set_key(Some(to_attribute_map(&delete.key)?))
                .set_condition_expression(delete.condition_expression)
                .set_expression_attribute_values(to_optional_attribute_map(
                    delete.expression_attribute_values.as_ref(),
                )?)
                .build()
                .map_err(build_error)?;
            TransactWriteItem::builder().delete(delete).build()
        }
    };
    Ok(item)
}

#[async_trait]
impl DatabaseService for DynamoDbService {
    async fn get_item(&self, request: GetRequest) -> ServiceResult<GetResponse> {
        let result = self
            .client
            .get_item()
            .table_name(request.table_name)
            .set_key(Some(to_attribute_map(&request.key)?))
            .set_consistent_read(request.consistent_read)
            .set_projection_expression(request.projection_expression)
            .set_expression_attribute_names(to_name_map(request.expression_attribute_names))
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(map_get_item_error)?;

        Ok(GetResponse {
            item: from_optional_attribute_map(result.item)?,
            consumed_capacity: result.consumed_capacity.as_ref().map(consumed_capacity),
        })
    }

    async fn put_item(&self, request: PutRequest) -> ServiceResult<WriteResponse> {
        let result = self
            .client
            .put_item()
            .table_name(request.table_name)
            .set_item(Some(to_attribute_map(&request.item)?))
            .set_condition_expression(request.condition_expression)
            .set_expression_attribute_values(to_optional_attribute_map(
                request.expression_attribute_values.as_ref(),
            )?)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(WriteResponse {
            consumed_capacity: result.consumed_capacity.as_ref().map(consumed_capacity),
        })
    }

    async fn delete_item(&self, request: DeleteRequest) -> ServiceResult<WriteResponse> {
        let result = self
            .client
            .delete_item()
            .table_name(request.table_name)
            .set_key(Some(to_attribute_map(&request.key)?))
            .set_condition_expression(request.condition_expression)
            .set_expression_attribute_values(to_optional_attribute_map(
                request.expression_attribute_values.as_ref(),
            )?)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(WriteResponse {
            consumed_capacity: result.consumed_capacity.as_ref().map(consumed_capacity),
        })
    }

    async fn query(&self, request: QueryRequest) -> ServiceResult<QueryResponse> {
        let result = self
            .client
            .query()
            .table_name(request.table_name)
            .set_index_name(request.index_name)
            .set_limit(request.limit)
            .set_consistent_read(request.consistent_read)
            .set_scan_index_forward(request.scan_index_forward)
            .set_exclusive_start_key(to_optional_attribute_map(
                request.exclusive_start_key.as_ref(),
            )?)
            .set_projection_expression(request.projection_expression)
            .set_expression_attribute_names(to_name_map(request.expression_attribute_names))
            .set_key_condition_expression(request.key_condition_expression)
            .set_expression_attribute_values(to_optional_attribute_map(
                request.expression_attribute_values.as_ref(),
            )?)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result
            .items
            .unwrap_or_default()
            .into_iter()
            .map(from_attribute_map)
            .collect::<ServiceResult<Vec<_>>>()?;

        Ok(QueryResponse {
            items,
            count: result.count,
            scanned_count: result.scanned_count,
            consumed_capacity: result.consumed_capacity.as_ref().map(consumed_capacity),
            last_evaluated_key: from_optional_attribute_map(result.last_evaluated_key)?,
        })
    }

    async fn transact_write_items(
        &self,
        request: TransactWriteRequest,
    ) -> ServiceResult<TransactWriteResponse> {
        let items = request
            .transact_items
            .into_iter()
            .map(transact_item)
            .collect::<ServiceResult<Vec<_>>>()?;

        let result = self
            .client
            .transact_write_items()
            .set_transact_items(Some(items))
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(map_transact_write_items_error)?;

        Ok(TransactWriteResponse {
            consumed_capacity: result
                .consumed_capacity
                .unwrap_or_default()
                .iter()
                .map(consumed_capacity)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tablekit_core::Document;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_transact_item_put() {
        let item = transact_item(WriteIntent::Put(PutRequest {
            table_name: "spaceships".to_string(),
            item: doc(json!({ "id": 821, "fuel": 9000 })),
            condition_expression: Some("attribute_not_exists(id)".to_string()),
            expression_attribute_values: None,
        }))
        .unwrap();

        let put = item.put().unwrap();
        assert_eq!(put.table_name(), "spaceships");
        assert_eq!(put.item().len(), 2);
        assert_eq!(put.condition_expression(), Some("attribute_not_exists(id)"));
        assert!(item.delete().is_none());
    }

    #[test]
    fn test_transact_item_delete() {
        let item = transact_item(WriteIntent::Delete(DeleteRequest {
            table_name: "cargo-to-spaceship".to_string(),
            key: doc(json!({ "p": "SOIL", "s": 821 })),
            condition_expression: Some("quantity = :q".to_string()),
            expression_attribute_values: Some(doc(json!({ ":q": 3 }))),
        }))
        .unwrap();

        let delete = item.delete().unwrap();
        assert_eq!(delete.table_name(), "cargo-to-spaceship");
        assert_eq!(delete.key().len(), 2);
        assert!(delete.expression_attribute_values().is_some());
    }

    #[tokio::test]
    async fn test_from_config_applies_region() {
        let service = DynamoDbService::from_config(&Config {
            endpoint_url: Some("http://localhost:8000".to_string()),
            region: "eu-west-1".to_string(),
        })
        .await;

        let config = service.client().config();
        assert_eq!(
            config.region().map(|region| region.to_string()),
            Some("eu-west-1".to_string())
        );
    }
}
