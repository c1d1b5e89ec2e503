//! In-memory Database Service implementation.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use tablekit_core::{
    ConsumedCapacity, DatabaseService, DeleteRequest, Document, GetRequest, GetResponse,
    PutRequest, QueryRequest, QueryResponse, ServiceError, ServiceResult, TransactWriteRequest,
    TransactWriteResponse, WriteIntent, WriteResponse, MAX_TRANSACT_ITEMS,
};

use super::expression::{
    compare_values, evaluate, parse_condition, parse_key_condition, parse_projection, project,
};

/// Partition key and optional sort key of a table or secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    partition_key: String,
    sort_key: Option<String>,
}

impl KeySchema {
    pub fn new(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: None,
        }
    }

    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }

    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    fn attributes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.partition_key.as_str()).chain(self.sort_key.as_deref())
    }
}

/// A request as received by the in-memory service, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    Get(GetRequest),
    Put(PutRequest),
    Delete(DeleteRequest),
    Query(QueryRequest),
    TransactWrite(TransactWriteRequest),
}

#[derive(Debug)]
struct Table {
    schema: KeySchema,
    indexes: HashMap<String, KeySchema>,
    items: BTreeMap<String, Document>,
}

impl Table {
    /// Storage key of `attributes` under the table's primary key.
    fn storage_key(&self, attributes: &Document) -> ServiceResult<String> {
        let mut parts = Vec::new();
        for name in self.schema.attributes() {
            match attributes.get(name) {
                Some(value @ (Value::String(_) | Value::Number(_))) => parts.push(value.to_string()),
                _ => {
                    return Err(ServiceError::validation(format!(
                        "One or more parameter values were invalid: Missing the key {name} in the item"
                    )))
                }
            }
        }
        Ok(parts.join("\u{1f}"))
    }

    /// Like `storage_key`, but the key must name exactly the key attributes.
    fn exact_key(&self, key: &Document) -> ServiceResult<String> {
        if key.len() != self.schema.attributes().count() {
            return Err(ServiceError::validation(
                "The provided key element does not match the schema",
            ));
        }
        self.storage_key(key)
            .map_err(|_| ServiceError::validation("The provided key element does not match the schema"))
    }

    fn key_of(&self, item: &Document, index: &KeySchema) -> Document {
        self.schema
            .attributes()
            .chain(index.attributes())
            .filter_map(|name| Some((name.to_string(), item.get(name)?.clone())))
            .collect()
    }
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Table>,
    requests: Vec<RecordedRequest>,
    failures: VecDeque<ServiceError>,
}

impl State {
    /// Records the request and returns any scripted failure.
    fn receive(&mut self, request: RecordedRequest) -> ServiceResult<()> {
        self.requests.push(request);
        match self.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn table(&self, name: &str) -> ServiceResult<&Table> {
        self.tables.get(name).ok_or_else(resource_not_found)
    }

    fn table_mut(&mut self, name: &str) -> ServiceResult<&mut Table> {
        self.tables.get_mut(name).ok_or_else(resource_not_found)
    }
}

fn resource_not_found() -> ServiceError {
    ServiceError::new(
        ServiceError::RESOURCE_NOT_FOUND,
        "Requested resource not found",
    )
}

fn conditional_check_failed() -> ServiceError {
    ServiceError::new(
        ServiceError::CONDITIONAL_CHECK_FAILED,
        "The conditional request failed",
    )
}

fn capacity(table: &str, units: f64) -> ConsumedCapacity {
    ConsumedCapacity {
        table_name: Some(table.to_string()),
        capacity_units: Some(units),
        ..Default::default()
    }
}

fn read_units(consistent_read: Option<bool>) -> f64 {
    if consistent_read.unwrap_or(false) {
        1.0
    } else {
        0.5
    }
}

fn check_condition(
    expression: Option<&str>,
    values: Option<&Document>,
    item: Option<&Document>,
) -> ServiceResult<bool> {
    match expression {
        Some(expression) => Ok(evaluate(&parse_condition(expression, values)?, item)),
        None => Ok(true),
    }
}

fn projection(
    expression: Option<&str>,
    names: Option<&BTreeMap<String, String>>,
) -> ServiceResult<Option<Vec<String>>> {
    expression
        .map(|expression| parse_projection(expression, names))
        .transpose()
}

/// Process-local Database Service for tests.
///
/// Tables must be registered with `create_table` before use. Every request is
/// recorded, and `fail_next` scripts a failure for the next call.
#[derive(Debug, Clone, Default)]
pub struct InMemoryService {
    state: Arc<RwLock<State>>,
}

impl InMemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an empty table, replacing any table of the same name.
    pub async fn create_table(&self, name: impl Into<String>, schema: KeySchema) {
        let mut state = self.state.write().await;
        state.tables.insert(
            name.into(),
            Table {
                schema,
                indexes: HashMap::new(),
                items: BTreeMap::new(),
            },
        );
    }

    pub async fn create_index(
        &self,
        table: &str,
        index: impl Into<String>,
        schema: KeySchema,
    ) -> ServiceResult<()> {
        let mut state = self.state.write().await;
        state.table_mut(table)?.indexes.insert(index.into(), schema);
        Ok(())
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.read().await.requests.clone()
    }

    /// Makes the next call fail with `error` after it has been recorded.
    pub async fn fail_next(&self, error: ServiceError) {
        self.state.write().await.failures.push_back(error);
    }

    /// Items stored in `table`, ordered by primary key.
    pub async fn items(&self, table: &str) -> Vec<Document> {
        let state = self.state.read().await;
        state
            .tables
            .get(table)
            .map(|table| table.items.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DatabaseService for InMemoryService {
    async fn get_item(&self, request: GetRequest) -> ServiceResult<GetResponse> {
        let mut state = self.state.write().await;
        state.receive(RecordedRequest::Get(request.clone()))?;

        let table = state.table(&request.table_name)?;
        let key = table.exact_key(&request.key)?;
        let attributes = projection(
            request.projection_expression.as_deref(),
            request.expression_attribute_names.as_ref(),
        )?;

        let item = table.items.get(&key).map(|item| match &attributes {
            Some(attributes) => project(item, attributes),
            None => item.clone(),
        });

        Ok(GetResponse {
            item,
            consumed_capacity: Some(capacity(
                &request.table_name,
                read_units(request.consistent_read),
            )),
        })
    }

    async fn put_item(&self, request: PutRequest) -> ServiceResult<WriteResponse> {
        let mut state = self.state.write().await;
        state.receive(RecordedRequest::Put(request.clone()))?;

        let table = state.table_mut(&request.table_name)?;
        let key = table.storage_key(&request.item)?;
        if !check_condition(
            request.condition_expression.as_deref(),
            request.expression_attribute_values.as_ref(),
            table.items.get(&key),
        )? {
            return Err(conditional_check_failed());
        }
        table.items.insert(key, request.item);

        Ok(WriteResponse {
            consumed_capacity: Some(capacity(&request.table_name, 1.0)),
        })
    }

    async fn delete_item(&self, request: DeleteRequest) -> ServiceResult<WriteResponse> {
        let mut state = self.state.write().await;
        state.receive(RecordedRequest::Delete(request.clone()))?;

        let table = state.table_mut(&request.table_name)?;
        let key = table.exact_key(&request.key)?;
        if !check_condition(
            request.condition_expression.as_deref(),
            request.expression_attribute_values.as_ref(),
            table.items.get(&key),
        )? {
            return Err(conditional_check_failed());
        }
        table.items.remove(&key);

        Ok(WriteResponse {
            consumed_capacity: Some(capacity(&request.table_name, 1.0)),
        })
    }

    async fn query(&self, request: QueryRequest) -> ServiceResult<QueryResponse> {
        let mut state = self.state.write().await;
        state.receive(RecordedRequest::Query(request.clone()))?;

        let table = state.table(&request.table_name)?;
        let schema = match &request.index_name {
            Some(index) => table.indexes.get(index).ok_or_else(|| {
                ServiceError::validation(format!(
                    "The table does not have the specified index: {index}"
                ))
            })?,
            None => &table.schema,
        };
        if let Some(limit) = request.limit.filter(|limit| *limit < 1) {
            return Err(ServiceError::validation(format!(
                "1 validation error detected: Value '{limit}' at 'limit' failed to satisfy constraint: Member must have value greater than or equal to 1"
            )));
        }

        let expression = request.key_condition_expression.as_deref().ok_or_else(|| {
            ServiceError::validation(
                "Either the KeyConditions or KeyConditionExpression parameter must be specified in the request.",
            )
        })?;
        let names = request.expression_attribute_names.as_ref();
        let condition = parse_key_condition(
            expression,
            schema.partition_key(),
            names,
            request.expression_attribute_values.as_ref(),
        )?;
        if let Some((path, _)) = &condition.sort {
            if schema.sort_key() != Some(path.as_str()) {
                return Err(ServiceError::validation(format!(
                    "Query key condition not supported: {path} is not a key attribute"
                )));
            }
        }

        let mut matches: Vec<&Document> = table
            .items
            .values()
            .filter(|item| item.get(&condition.partition_key) == Some(&condition.partition_value))
            .filter(|item| match &condition.sort {
                Some((path, sort)) => item.get(path).is_some_and(|value| sort.matches(value)),
                None => true,
            })
            .collect();

        if let Some(sort_key) = schema.sort_key() {
            matches.sort_by(|a, b| {
                let ordering = match (a.get(sort_key), b.get(sort_key)) {
                    (Some(a), Some(b)) => compare_values(a, b),
                    _ => None,
                };
                ordering.unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        if request.scan_index_forward == Some(false) {
            matches.reverse();
        }

        if let Some(start) = &request.exclusive_start_key {
            let position = matches
                .iter()
                .position(|item| start.iter().all(|(name, value)| item.get(name) == Some(value)))
                .ok_or_else(|| ServiceError::validation("The provided starting key is invalid"))?;
            matches.drain(..=position);
        }

        let mut last_evaluated_key = None;
        if let Some(limit) = request.limit.map(|limit| limit as usize) {
            if matches.len() > limit {
                matches.truncate(limit);
                last_evaluated_key = matches.last().map(|item| table.key_of(item, schema));
            }
        }

        let attributes = projection(request.projection_expression.as_deref(), names)?;
        let items: Vec<Document> = matches
            .into_iter()
            .map(|item| match &attributes {
                Some(attributes) => project(item, attributes),
                None => item.clone(),
            })
            .collect();
        let count = items.len() as i32;

        Ok(QueryResponse {
            items,
            count,
            scanned_count: count,
            consumed_capacity: Some(capacity(
                &request.table_name,
                read_units(request.consistent_read),
            )),
            last_evaluated_key,
        })
    }

    async fn transact_write_items(
        &self,
        request: TransactWriteRequest,
    ) -> ServiceResult<TransactWriteResponse> {
        let mut state = self.state.write().await;
        state.receive(RecordedRequest::TransactWrite(request.clone()))?;

        let count = request.transact_items.len();
        if count == 0 || count > MAX_TRANSACT_ITEMS {
            let bound = if count == 0 {
                "greater than or equal to 1".to_string()
            } else {
                format!("less than or equal to {MAX_TRANSACT_ITEMS}")
            };
            return Err(ServiceError::validation(format!(
                "1 validation error detected: Value at 'transactItems' failed to satisfy constraint: Member must have length {bound}"
            )));
        }

        let mut seen = HashSet::new();
        let mut keys = Vec::with_capacity(count);
        let mut reasons = Vec::with_capacity(count);
        for intent in &request.transact_items {
            let table = state.table(intent.table_name())?;
            let (key, expression, values) = match intent {
                WriteIntent::Put(put) => (
                    table.storage_key(&put.item)?,
                    put.condition_expression.as_deref(),
                    put.expression_attribute_values.as_ref(),
                ),
                WriteIntent::Delete(delete) => (
                    table.exact_key(&delete.key)?,
                    delete.condition_expression.as_deref(),
                    delete.expression_attribute_values.as_ref(),
                ),
            };
            if !seen.insert((intent.table_name().to_string(), key.clone())) {
                return Err(ServiceError::validation(
                    "Transaction request cannot include multiple operations on one item",
                ));
            }

            let passed = check_condition(expression, values, table.items.get(&key))?;
            reasons.push(if passed { "None" } else { "ConditionalCheckFailed" });
            keys.push(key);
        }

        if reasons.iter().any(|reason| *reason != "None") {
            return Err(ServiceError::new(
                ServiceError::TRANSACTION_CANCELED,
                format!(
                    "Transaction cancelled, please refer cancellation reasons for specific reasons [{}]",
                    reasons.join(", ")
                ),
            ));
        }

        let mut consumed: Vec<ConsumedCapacity> = Vec::new();
        for (intent, key) in request.transact_items.into_iter().zip(keys) {
            let table_name = intent.table_name().to_string();
            let table = state.table_mut(&table_name)?;
            match intent {
                WriteIntent::Put(put) => {
                    table.items.insert(key, put.item);
                }
                WriteIntent::Delete(_) => {
                    table.items.remove(&key);
                }
            }

            match consumed
                .iter_mut()
                .find(|entry| entry.table_name.as_deref() == Some(table_name.as_str()))
            {
                Some(entry) => {
                    entry.capacity_units = entry.capacity_units.map(|units| units + 2.0);
                }
                None => consumed.push(capacity(&table_name, 2.0)),
            }
        }

        Ok(TransactWriteResponse {
            consumed_capacity: consumed,
        })
    }
}
