//! tablekit_core - pure types and contracts shared by the tablekit crates.
//!
//! Nothing in this crate performs I/O. The `DatabaseService` trait is the seam
//! where a concrete backend (DynamoDB, in-memory) plugs in.

pub mod error;
pub mod log;
pub mod operation;
pub mod projection;
pub mod requests;
pub mod service;

pub use error::{EnrichedError, Error, Result, ServiceError};
pub use log::{emit, LogMethod, NoopLog, TracingLog};
pub use operation::OperationKind;
pub use projection::ProjectionSpec;
pub use requests::{
    ConsumedCapacity, DeleteRequest, Document, GetRequest, GetResponse, PutRequest, QueryRequest,
    QueryResponse, TransactWriteRequest, TransactWriteResponse, WriteIntent, WriteResponse,
    MAX_TRANSACT_ITEMS,
};
pub use service::{DatabaseService, ServiceResult};
