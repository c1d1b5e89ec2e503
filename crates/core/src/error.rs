use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::operation::OperationKind;

/// A named failure reported by the Database Service.
///
/// `name` is the service's error code (`ConditionalCheckFailedException`,
/// `TransactionCanceledException`, ...) and `message` its text, both verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[error("{name}: {message}")]
pub struct ServiceError {
    pub name: String,
    pub message: String,
}

impl ServiceError {
    pub const CONDITIONAL_CHECK_FAILED: &'static str = "ConditionalCheckFailedException";
    pub const RESOURCE_NOT_FOUND: &'static str = "ResourceNotFoundException";
    pub const TRANSACTION_CANCELED: &'static str = "TransactionCanceledException";
    pub const VALIDATION: &'static str = "ValidationException";

    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(Self::VALIDATION, message)
    }

    pub fn is_conditional_check_failed(&self) -> bool {
        self.name == Self::CONDITIONAL_CHECK_FAILED
    }

    pub fn is_transaction_canceled(&self) -> bool {
        self.name == Self::TRANSACTION_CANCELED
    }
}

/// A Database Service failure wrapped with the operation and input that caused it.
///
/// The wrapped `ServiceError` is kept as-is; the rendered message only adds
/// context around its name and message.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedError {
    operation: OperationKind,
    cause: ServiceError,
    input: Value,
}

impl EnrichedError {
    pub fn new(operation: OperationKind, cause: ServiceError, input: Value) -> Self {
        Self {
            operation,
            cause,
            input,
        }
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    pub fn cause(&self) -> &ServiceError {
        &self.cause
    }

    /// The full input that was attempted, as structured JSON.
    pub fn input(&self) -> &Value {
        &self.input
    }

    /// Renders the diagnostic text carried by this error.
    pub fn render(&self) -> String {
        let input = serde_json::to_string_pretty(&self.input)
            .unwrap_or_else(|_| self.input.to_string());

        format!(
            "Error found executing dynamodb {}.\n\nFound Error:\n{}: {}\n\nInput:\n{}",
            self.operation, self.cause.name, self.cause.message, input
        )
    }
}

impl fmt::Display for EnrichedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl std::error::Error for EnrichedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Errors returned by tablekit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A Database Service failure, with operation and input context.
    #[error("{0}")]
    Enriched(Box<EnrichedError>),

    /// A document could not be converted to or from the wire format.
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wraps a service failure with the operation kind and attempted input.
    pub fn enrich(operation: OperationKind, cause: ServiceError, input: &impl Serialize) -> Self {
        let input = serde_json::to_value(input)
            .unwrap_or_else(|e| Value::String(format!("<input could not be serialized: {e}>")));
        Error::Enriched(Box::new(EnrichedError::new(operation, cause, input)))
    }

    /// The underlying service failure, if this error came from the Database Service.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Error::Enriched(enriched) => Some(enriched.cause()),
            _ => None,
        }
    }

    pub fn operation(&self) -> Option<OperationKind> {
        match self {
            Error::Enriched(enriched) => Some(enriched.operation()),
            _ => None,
        }
    }
}

/// Result type for tablekit operations.
pub type Result<T> = std::result::Result<T, Error>;
