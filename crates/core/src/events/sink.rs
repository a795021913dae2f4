use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use thiserror::Error;

use super::{EventRecord, ScanEvent};

#[derive(Debug, Error)]
pub enum EventSinkError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open event log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for structured run events.
///
/// Emitting never fails the caller: sinks log their own write errors.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ScanEvent);
}

/// Sink that drops every event (used when JSON logging is disabled).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: ScanEvent) {}
}

/// Appends one JSON object per line to a log file.
pub struct JsonlEventSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlEventSink {
    /// Open (or create) a specific log file in append mode.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, EventSinkError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| EventSinkError::Open {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Create `log_dir` if needed and open `scan_<YYYYmmdd_HHMMSS>.jsonl` in it.
    pub fn in_dir(log_dir: &Path) -> Result<Self, EventSinkError> {
        fs::create_dir_all(log_dir).map_err(|source| EventSinkError::CreateDir {
            path: log_dir.to_path_buf(),
            source,
        })?;

        let file_name = format!("scan_{}.jsonl", Local::now().format("%Y%m%d_%H%M%S"));
        Self::open(log_dir.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for JsonlEventSink {
    fn emit(&self, event: ScanEvent) {
        let record = EventRecord::now(&event);
        let mut line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to serialize {} event: {}", event.event_type(), e);
                return;
            }
        };
        line.push('\n');

        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = file.write_all(line.as_bytes()) {
            tracing::error!(
                "Failed to write event to {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
