//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `ServiceError`, keeping the service's error code and
//! message verbatim.

use std::error::Error as StdError;
use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::CancellationReason;
use tablekit_core::ServiceError;

/// Map any SDK error to a `ServiceError`.
///
/// Service errors keep their code and message. Errors raised before a
/// response arrived (construction, timeout, dispatch) are named after the
/// failure kind and carry the full error chain as the message.
fn service_error<E, R>(err: SdkError<E, R>) -> ServiceError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    if let Some(code) = err.code() {
        return ServiceError::new(code, err.message().unwrap_or_default());
    }

    let name = match &err {
        SdkError::ConstructionFailure(_) => "ConstructionFailure",
        SdkError::TimeoutError(_) => "TimeoutError",
        SdkError::DispatchFailure(_) => "DispatchFailure",
        SdkError::ResponseError(_) => "ResponseError",
        SdkError::ServiceError(_) => "UnknownServiceError",
        _ => "SdkError",
    };
    ServiceError::new(name, DisplayErrorContext(&err).to_string())
}

/// Map a GetItem SDK error to ServiceError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> ServiceError {
    service_error(err)
}

/// Map a Query SDK error to ServiceError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> ServiceError {
    service_error(err)
}

/// Map a PutItem SDK error to ServiceError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> ServiceError {
    service_error(err)
}

/// Map a DeleteItem SDK error to ServiceError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> ServiceError {
    service_error(err)
}

/// Map a TransactWriteItems SDK error to ServiceError.
///
/// Cancellation reasons are appended to the message in batch order, so the
/// failing intent can be found by position.
pub fn map_transact_write_items_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<TransactWriteItemsError, R>,
) -> ServiceError {
    let reasons = match err.as_service_error() {
        Some(TransactWriteItemsError::TransactionCanceledException(cancelled)) => {
            Some(format_cancellation_reasons(cancelled.cancellation_reasons()))
        }
        _ => None,
    };

    let mut error = service_error(err);
    if let Some(reasons) = reasons {
        error.message = format!("{}\nCancellation reasons: [{}]", error.message, reasons);
    }
    error
}

fn format_cancellation_reasons(reasons: &[CancellationReason]) -> String {
    reasons
        .iter()
        .map(|reason| match (reason.code(), reason.message()) {
            (Some(code), Some(message)) if code != "None" => format!("{code}: {message}"),
            (Some(code), _) => code.to_string(),
            (None, _) => "None".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
