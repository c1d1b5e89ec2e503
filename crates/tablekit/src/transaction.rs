//! Write transactions: an ordered batch of put/delete intents executed as one
//! all-or-nothing call.
//!
//! A `Transaction` is the building state. `execute` consumes it, so a
//! transaction can neither be executed twice nor queued into afterwards.

use std::fmt;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;

use tablekit_core::log::emit;
use tablekit_core::{
    ConsumedCapacity, DatabaseService, Error, LogMethod, OperationKind, Result,
    TransactWriteRequest, WriteIntent, MAX_TRANSACT_ITEMS,
};

use crate::inputs::{DeleteInput, PutInput};

/// Append-only, ordered list of write intents.
#[derive(Debug, Clone, Default)]
pub struct WriteQueue {
    intents: Vec<WriteIntent>,
    warned: bool,
}

impl WriteQueue {
    /// Queues a put of `input.item` into `input.table_name`.
    pub fn put(&mut self, input: PutInput) -> &mut Self {
        self.push(WriteIntent::Put(input.to_request()))
    }

    /// Queues a delete of `input.key` from `input.table_name`.
    pub fn delete(&mut self, input: DeleteInput) -> &mut Self {
        self.push(WriteIntent::Delete(input.to_request()))
    }

    pub fn push(&mut self, intent: WriteIntent) -> &mut Self {
        self.intents.push(intent);

        if self.intents.len() > MAX_TRANSACT_ITEMS && !self.warned {
            self.warned = true;
            tracing::warn!(
                count = self.intents.len(),
                max = MAX_TRANSACT_ITEMS,
                "Write transaction exceeds the service batch limit and will likely be rejected"
            );
        }

        self
    }

    pub fn intents(&self) -> &[WriteIntent] {
        &self.intents
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// The transactional-write request carrying every intent in queued order.
    pub fn to_request(&self) -> TransactWriteRequest {
        TransactWriteRequest {
            transact_items: self.intents.clone(),
        }
    }
}

/// Outcome of a committed transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub start_timestamp: String,
    pub intent_count: usize,
    pub consumed_capacity: Vec<ConsumedCapacity>,
}

/// Diagnostic payload for a whole batch.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteItems<'a> {
    write_items: &'a [WriteIntent],
}

pub struct Transaction {
    service: Arc<dyn DatabaseService>,
    queue: WriteQueue,
    start_timestamp: String,
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("queue", &self.queue)
            .field("start_timestamp", &self.start_timestamp)
            .finish_non_exhaustive()
    }
}

impl Transaction {
    /// Opens an empty transaction and stamps its start time.
    pub fn new(service: Arc<dyn DatabaseService>) -> Self {
        Self {
            service,
            queue: WriteQueue::default(),
            start_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// ISO-8601 UTC time the transaction was opened, e.g. `2026-10-17T09:12:44.031Z`.
    ///
    /// Use it to stamp "effective at" fields consistently across the batch.
    pub fn start_timestamp(&self) -> &str {
        &self.start_timestamp
    }

    pub fn queue(&mut self) -> &mut WriteQueue {
        &mut self.queue
    }

    pub fn intents(&self) -> &[WriteIntent] {
        self.queue.intents()
    }

    /// Sends the whole batch as one transactional write.
    ///
    /// On failure the enriched error carries every queued intent, in order,
    /// since the service reports cancellation reasons positionally.
    pub async fn execute(self, log: &dyn LogMethod) -> Result<TransactionReceipt> {
        let intents = self.queue.intents();
        let count = intents.len();

        emit(
            log,
            "writeTransaction.execute.input",
            json!({
                "startTimestamp": self.start_timestamp,
                "itemCount": count,
                "writeItems": intents,
            }),
        );

        let response = self
            .service
            .transact_write_items(self.queue.to_request())
            .await
            .map_err(|cause| {
                Error::enrich(
                    OperationKind::WriteTransaction,
                    cause,
                    &WriteItems {
                        write_items: intents,
                    },
                )
            })?;

        emit(
            log,
            "writeTransaction.execute.output",
            json!({
                "success": true,
                "startTimestamp": self.start_timestamp,
                "stats": {
                    "itemCount": count,
                    "consumedCapacity": response.consumed_capacity,
                },
            }),
        );

        Ok(TransactionReceipt {
            start_timestamp: self.start_timestamp,
            intent_count: count,
            consumed_capacity: response.consumed_capacity,
        })
    }
}
