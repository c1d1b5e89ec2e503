//! Database Service implementations.
//!
//! The implementations are selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `dynamodb` (default): AWS DynamoDB over `aws-sdk-dynamodb`
//! - `inmemory` (default): process-local tables for tests

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbService;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryService;
