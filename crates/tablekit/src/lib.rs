//! tablekit - typed get/put/delete/query and write transactions over DynamoDB.
//!
//! Every operation reports tagged diagnostics through a `LogMethod` hook and
//! wraps Database Service failures with the operation and input that caused
//! them.

pub mod cli;
pub mod client;
pub mod config;
pub mod inputs;
pub mod output;
pub mod storage;
pub mod transaction;

pub use client::SimpleDynamodbClient;
pub use config::Config;
pub use inputs::{
    to_document, DeleteConditions, DeleteInput, GetConditions, GetInput, PutConditions, PutInput,
    QueryConditions, QueryInput,
};
pub use transaction::{Transaction, TransactionReceipt, WriteQueue};

pub use tablekit_core::{
    Document, EnrichedError, Error, LogMethod, NoopLog, OperationKind, Result, ServiceError,
    TracingLog,
};
