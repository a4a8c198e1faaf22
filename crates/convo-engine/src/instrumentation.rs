//! The Instrumentation Emitter: produces lifecycle events for
//! action/tool invocations within one plan execution.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The kind of invocation an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Action,
    Tool,
}

/// The lifecycle stage an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Requested,
    Started,
    Succeeded,
    Failed,
}

/// One instrumentation event.
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub kind: EventKind,
    pub name: String,
    pub correlation_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: Option<i64>,
    pub attributes: HashMap<String, String>,
}

/// A listener registered against a correlation id.
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Emits lifecycle events for one plan execution.
///
/// Single-threaded with respect to one execution; a new
/// `InstrumentationEmitter` is created per [`crate::executor::execute`]
/// call, so concurrent executors never share one instance.
#[derive(Default)]
pub struct InstrumentationEmitter {
    listeners: Mutex<HashMap<Uuid, Vec<Listener>>>,
    /// Correlation ids that have seen a REQUESTED event, used to assert
    /// the emitter's ordering guarantee (a) in debug builds.
    requested: Mutex<std::collections::HashSet<Uuid>>,
}

impl InstrumentationEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for a specific correlation id.
    pub fn on(&self, correlation_id: Uuid, listener: Listener) {
        self.listeners.lock().unwrap().entry(correlation_id).or_default().push(listener);
    }

    fn dispatch(&self, event: Event) {
        if let Some(listeners) = self.listeners.lock().unwrap().get(&event.correlation_id) {
            for listener in listeners {
                listener(&event);
            }
        }
    }

    pub fn emit_requested(&self, kind: EventKind, name: impl Into<String>, correlation_id: Uuid) {
        self.requested.lock().unwrap().insert(correlation_id);
        self.dispatch(Event {
            event_type: EventType::Requested,
            kind,
            name: name.into(),
            correlation_id,
            timestamp: Utc::now(),
            duration_ms: None,
            attributes: HashMap::new(),
        });
    }

    /// Panics if no REQUESTED was emitted first for this
    /// `correlation_id` — the emitter's core ordering guarantee.
    pub fn emit_started(&self, kind: EventKind, name: impl Into<String>, correlation_id: Uuid) {
        assert!(
            self.requested.lock().unwrap().contains(&correlation_id),
            "STARTED emitted without a prior REQUESTED for {correlation_id}"
        );
        self.dispatch(Event {
            event_type: EventType::Started,
            kind,
            name: name.into(),
            correlation_id,
            timestamp: Utc::now(),
            duration_ms: None,
            attributes: HashMap::new(),
        });
    }

    pub fn emit_succeeded(
        &self,
        kind: EventKind,
        name: impl Into<String>,
        correlation_id: Uuid,
        duration_ms: i64,
        attributes: HashMap<String, String>,
    ) {
        self.dispatch(Event {
            event_type: EventType::Succeeded,
            kind,
            name: name.into(),
            correlation_id,
            timestamp: Utc::now(),
            duration_ms: Some(duration_ms),
            attributes,
        });
    }

    pub fn emit_failed(
        &self,
        kind: EventKind,
        name: impl Into<String>,
        correlation_id: Uuid,
        duration_ms: i64,
        attributes: HashMap<String, String>,
    ) {
        self.dispatch(Event {
            event_type: EventType::Failed,
            kind,
            name: name.into(),
            correlation_id,
            timestamp: Utc::now(),
            duration_ms: Some(duration_ms),
            attributes,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn listener_receives_events_for_its_correlation_id() {
        let emitter = InstrumentationEmitter::new();
        let correlation_id = Uuid::new_v4();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        emitter.on(correlation_id, Arc::new(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        emitter.emit_requested(EventKind::Action, "runSqlQuery", correlation_id);
        emitter.emit_started(EventKind::Action, "runSqlQuery", correlation_id);
        emitter.emit_succeeded(EventKind::Action, "runSqlQuery", correlation_id, 12, HashMap::new());

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    #[should_panic(expected = "STARTED emitted without a prior REQUESTED")]
    fn started_without_requested_panics() {
        let emitter = InstrumentationEmitter::new();
        emitter.emit_started(EventKind::Action, "x", Uuid::new_v4());
    }

    #[test]
    fn unrelated_correlation_id_does_not_receive_events() {
        let emitter = InstrumentationEmitter::new();
        let watched = Uuid::new_v4();
        let other = Uuid::new_v4();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        emitter.on(watched, Arc::new(move |_e| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        emitter.emit_requested(EventKind::Action, "x", other);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
