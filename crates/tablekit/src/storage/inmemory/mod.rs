//! In-memory Database Service for testing.
//!
//! Tables live in a `BTreeMap` behind `Arc<RwLock<_>>`. Only the subset of the
//! expression language needed by the client is understood: key conditions with
//! an optional sort key test, and simple existence/equality conditions.
//!
//! # Example
//!
//! ```rust,ignore
//! use tablekit::storage::inmemory::{InMemoryService, KeySchema};
//!
//! let service = InMemoryService::new();
//! service.create_table("spaceships", KeySchema::new("id")).await;
//! ```

mod expression;
mod service;

pub use service::{InMemoryService, KeySchema, RecordedRequest};
