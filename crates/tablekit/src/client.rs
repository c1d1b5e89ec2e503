//! The typed convenience client.
//!
//! Each operation logs its input through the diagnostic hook, calls the
//! Database Service, logs the outcome with consumed capacity, and wraps any
//! service failure into an enriched error naming the operation and input.

use std::sync::Arc;

use serde_json::json;

use tablekit_core::log::emit;
use tablekit_core::{
    DatabaseService, Document, Error, LogMethod, OperationKind, QueryResponse, Result,
    TracingLog, WriteResponse,
};

use crate::inputs::{DeleteInput, GetInput, PutInput, QueryInput};
use crate::transaction::Transaction;

/// Get/put/delete/query and write transactions over an injected Database Service.
///
/// The client is cheap to clone; clones share the same service handle and log hook.
#[derive(Clone)]
pub struct SimpleDynamodbClient {
    service: Arc<dyn DatabaseService>,
    log: Arc<dyn LogMethod>,
}

impl SimpleDynamodbClient {
    /// Creates a client that reports diagnostics through `tracing`.
    pub fn new(service: Arc<dyn DatabaseService>) -> Self {
        Self {
            service,
            log: Arc::new(TracingLog),
        }
    }

    /// Replaces the diagnostic log hook.
    pub fn with_log(mut self, log: Arc<dyn LogMethod>) -> Self {
        self.log = log;
        self
    }

    pub fn log(&self) -> &Arc<dyn LogMethod> {
        &self.log
    }

    /// Fetches one item, restricted to the requested attributes.
    ///
    /// Returns `Ok(None)` when no item exists under the key.
    pub async fn get(&self, input: GetInput) -> Result<Option<Document>> {
        let table = &input.table_name;
        emit(
            self.log.as_ref(),
            &format!("{table}.get.input"),
            json!({
                "tableName": table,
                "key": input.key,
                "conditions": input.get_conditions,
            }),
        );

        let response = self
            .service
            .get_item(input.to_request())
            .await
            .map_err(|cause| Error::enrich(OperationKind::Get, cause, &input))?;

        emit(
            self.log.as_ref(),
            &format!("{table}.get.output"),
            json!({
                "success": true,
                "tableName": table,
                "key": input.key,
                "conditions": input.get_conditions,
                "stats": {
                    "itemCount": if response.item.is_some() { 1 } else { 0 },
                    "consumedCapacity": response.consumed_capacity,
                },
            }),
        );

        Ok(response.item)
    }

    /// Runs a query and returns the matching items of the page.
    pub async fn query(&self, input: QueryInput) -> Result<Vec<Document>> {
        Ok(self.query_page(input).await?.items)
    }

    /// Runs a query and returns the full page, including `LastEvaluatedKey`.
    pub async fn query_page(&self, input: QueryInput) -> Result<QueryResponse> {
        let table = &input.table_name;
        emit(
            self.log.as_ref(),
            &format!("{table}.query.input"),
            json!({
                "tableName": table,
                "queryConditions": input.query_conditions,
            }),
        );

        let response = self
            .service
            .query(input.to_request())
            .await
            .map_err(|cause| Error::enrich(OperationKind::Query, cause, &input))?;

        emit(
            self.log.as_ref(),
            &format!("{table}.query.output"),
            json!({
                "tableName": table,
                "queryConditions": input.query_conditions,
                "stats": {
                    "itemCount": response.count,
                    "scannedCount": response.scanned_count,
                    "consumedCapacity": response.consumed_capacity,
                    "lastEvaluatedKey": response.last_evaluated_key,
                },
            }),
        );

        Ok(response)
    }

    /// Creates or replaces one item, subject to the optional put condition.
    pub async fn put(&self, input: PutInput) -> Result<WriteResponse> {
        let table = &input.table_name;
        emit(
            self.log.as_ref(),
            &format!("{table}.put.input"),
            json!({
                "tableName": table,
                "item": input.item,
                "conditions": input.put_conditions,
            }),
        );

        let response = self
            .service
            .put_item(input.to_request())
            .await
            .map_err(|cause| Error::enrich(OperationKind::Put, cause, &input))?;

        emit(
            self.log.as_ref(),
            &format!("{table}.put.output"),
            json!({
                "success": true,
                "tableName": table,
                "item": input.item,
                "conditions": input.put_conditions,
                "stats": {
                    "consumedCapacity": response.consumed_capacity,
                },
            }),
        );

        Ok(response)
    }

    /// Deletes one item, subject to the optional delete condition.
    pub async fn delete(&self, input: DeleteInput) -> Result<WriteResponse> {
        let table = &input.table_name;
        emit(
            self.log.as_ref(),
            &format!("{table}.delete.input"),
            json!({
                "tableName": table,
                "key": input.key,
                "conditions": input.delete_conditions,
            }),
        );

        let response = self
            .service
            .delete_item(input.to_request())
            .await
            .map_err(|cause| Error::enrich(OperationKind::Delete, cause, &input))?;

        emit(
            self.log.as_ref(),
            &format!("{table}.delete.output"),
            json!({
                "success": true,
                "tableName": table,
                "key": input.key,
                "conditions": input.delete_conditions,
                "stats": {
                    "consumedCapacity": response.consumed_capacity,
                },
            }),
        );

        Ok(response)
    }

    /// Opens an empty write transaction against this client's service.
    pub fn start_transaction(&self) -> Transaction {
        Transaction::new(self.service.clone())
    }
}
