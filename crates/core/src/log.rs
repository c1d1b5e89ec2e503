//! Diagnostic logging hook.
//!
//! Every operation reports a tagged input snapshot before calling the
//! Database Service and a tagged outcome after it succeeds. The hook is an
//! injected capability: any `Fn(&str, &Value)` works, `TracingLog` forwards to
//! `tracing`, and `NoopLog` drops everything.

use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

/// A sink for tagged diagnostic payloads.
///
/// Implementations must return promptly; they run inline on the caller's task.
pub trait LogMethod: Send + Sync {
    fn log(&self, message: &str, metadata: &Value);
}

impl<F> LogMethod for F
where
    F: Fn(&str, &Value) + Send + Sync,
{
    fn log(&self, message: &str, metadata: &Value) {
        self(message, metadata)
    }
}

/// Forwards every diagnostic to a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl LogMethod for TracingLog {
    fn log(&self, message: &str, metadata: &Value) {
        tracing::debug!(target: "tablekit", tag = message, metadata = %metadata);
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl LogMethod for NoopLog {
    fn log(&self, _message: &str, _metadata: &Value) {}
}

/// Calls the hook, containing any panic it raises so the operation goes on.
pub fn emit(log: &dyn LogMethod, message: &str, metadata: Value) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| log.log(message, &metadata)));
    if outcome.is_err() {
        tracing::warn!(tag = message, "Diagnostic log hook panicked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_closure_is_a_log_method() {
        let lines: Arc<Mutex<Vec<(String, Value)>>> = Arc::default();
        let sink = lines.clone();
        let log = move |message: &str, metadata: &Value| {
            sink.lock()
                .unwrap()
                .push((message.to_string(), metadata.clone()));
        };

        emit(&log, "spaceships.get.input", json!({ "tableName": "spaceships" }));

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, "spaceships.get.input");
        assert_eq!(lines[0].1["tableName"], "spaceships");
    }

    fn exploding_hook(_: &str, _: &Value) {
        panic!("hook exploded");
    }

    #[test]
    fn test_panicking_hook_is_contained() {
        emit(&exploding_hook, "spaceships.put.output", json!({}));
    }

    #[test]
    fn test_builtin_hooks_accept_any_payload() {
        emit(&TracingLog, "tag", json!({ "nested": [1, 2, 3] }));
        emit(&NoopLog, "tag", Value::Null);
    }
}
