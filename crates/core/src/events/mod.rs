//! Structured run events.
//!
//! Components receive an [`EventSink`] at construction and emit
//! [`ScanEvent`]s to it; the JSONL sink writes them as
//! `{timestamp, level, event, ...context}` records.

mod events;
mod sink;

pub use events::*;
pub use sink::*;
