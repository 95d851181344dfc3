//! Call lifecycle observation.
//!
//! A pure side channel: if an observer is configured it receives one event
//! per lifecycle step, synchronously and in causal order. The compiler never
//! consumes a return value from an observer, so no observer can alter or
//! block the pipeline.

use serde_json::{Map, Value};
use tracing::debug;

/// One lifecycle step of a compiled call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallEvent {
    MethodCallStarted {
        module: String,
        method: String,
    },
    RequestCompiled {
        query: String,
        variables: Map<String, Value>,
        body: String,
    },
    ResponseReceived {
        body: Value,
    },
    CallProcessed {
        module: String,
        method: String,
        return_value: Value,
    },
}

impl CallEvent {
    /// Short event name, for logging and filtering.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MethodCallStarted { .. } => "method-call-started",
            Self::RequestCompiled { .. } => "request-compiled",
            Self::ResponseReceived { .. } => "response-received",
            Self::CallProcessed { .. } => "call-processed",
        }
    }
}

/// Sink for call lifecycle events. Fire-and-forget: the return is `()` and
/// a panicking observer is the observer's own fault.
pub trait CallObserver: Send + Sync {
    fn observe(&self, event: &CallEvent);
}

/// Observer that forwards every event to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn observe(&self, event: &CallEvent) {
        match event {
            CallEvent::MethodCallStarted { module, method } => {
                debug!(event = event.name(), module, method, "call started");
            }
            CallEvent::RequestCompiled { query, body, .. } => {
                debug!(event = event.name(), query, body, "request compiled");
            }
            CallEvent::ResponseReceived { body } => {
                debug!(event = event.name(), body = %body, "response received");
            }
            CallEvent::CallProcessed { module, method, .. } => {
                debug!(event = event.name(), module, method, "call processed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn event_names_follow_lifecycle_order() {
        let events = [
            CallEvent::MethodCallStarted {
                module: "test".into(),
                method: "testMethod".into(),
            },
            CallEvent::RequestCompiled {
                query: "query { test { testMethod } }".into(),
                variables: Map::new(),
                body: String::new(),
            },
            CallEvent::ResponseReceived { body: json!({}) },
            CallEvent::CallProcessed {
                module: "test".into(),
                method: "testMethod".into(),
                return_value: json!(5),
            },
        ];
        let names: Vec<&str> = events.iter().map(CallEvent::name).collect();
        assert_eq!(
            names,
            [
                "method-call-started",
                "request-compiled",
                "response-received",
                "call-processed",
            ]
        );
    }

    #[test]
    fn tracing_observer_accepts_every_event() {
        let observer = TracingObserver;
        observer.observe(&CallEvent::ResponseReceived { body: json!(null) });
        observer.observe(&CallEvent::MethodCallStarted {
            module: "test".into(),
            method: "m".into(),
        });
    }
}
