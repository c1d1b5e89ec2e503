use async_trait::async_trait;

use crate::error::ServiceError;
use crate::requests::{
    DeleteRequest, GetRequest, GetResponse, PutRequest, QueryRequest, QueryResponse,
    TransactWriteRequest, TransactWriteResponse, WriteResponse,
};

/// Result of a single Database Service call.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// The remote document store, one method per request kind.
///
/// Implementations always ask the service for total consumed capacity and
/// report it in the response. They perform no retries and no validation of
/// their own beyond what the store enforces.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    /// Fetches one item by primary key. A missing item is `Ok` with `item: None`.
    async fn get_item(&self, request: GetRequest) -> ServiceResult<GetResponse>;

    /// Creates or replaces one item.
    async fn put_item(&self, request: PutRequest) -> ServiceResult<WriteResponse>;

    /// Deletes one item by primary key.
    async fn delete_item(&self, request: DeleteRequest) -> ServiceResult<WriteResponse>;

    /// Reads the items matching a key condition from a table or index.
    async fn query(&self, request: QueryRequest) -> ServiceResult<QueryResponse>;

    /// Applies every write intent atomically, in order, or none of them.
    async fn transact_write_items(
        &self,
        request: TransactWriteRequest,
    ) -> ServiceResult<TransactWriteResponse>;
}
