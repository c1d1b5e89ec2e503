//! DynamoDB storage backend.
//!
//! Translates `tablekit_core` requests into `aws-sdk-dynamodb` calls. Documents
//! are converted with `serde_dynamo`.

mod conversions;
mod error;
mod service;

pub use service::DynamoDbService;
