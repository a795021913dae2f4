//! Event sink that keeps events in memory.

use std::sync::Mutex;

use crate::events::{EventSink, ScanEvent};

/// Records every emitted event for test assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ScanEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScanEvent> {
        self.events.lock().expect("sink poisoned").clone()
    }

    /// Event type tags in emission order.
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .expect("sink poisoned")
            .iter()
            .map(|e| e.event_type())
            .collect()
    }

    /// Number of events with the given type tag.
    pub fn count(&self, event_type: &str) -> usize {
        self.event_types()
            .into_iter()
            .filter(|t| *t == event_type)
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: ScanEvent) {
        self.events.lock().expect("sink poisoned").push(event);
    }
}
