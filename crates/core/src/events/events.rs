use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::Category;

/// Severity attached to each event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventLevel {
    Info,
    Warning,
    Error,
}

/// Events written to the run's event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScanEvent {
    // Session lifecycle
    ScanSessionStarted {
        /// "dry-run" or "execute"
        mode: String,
        auto_yes: bool,
    },
    ScanSessionCompleted {
        /// Terminal session state (e.g., "no_broken_found")
        outcome: String,
        broken_found: bool,
        exit_code: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deleted: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        failed: Option<usize>,
    },
    /// Fatal prerequisite failure
    Error {
        /// Machine readable reason (e.g., "mount_missing")
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instance: Option<String>,
        path: String,
    },

    // Scan events
    ScanStarted {
        instance: String,
        category: Category,
        mount_path: String,
    },
    FolderSkipped {
        instance: String,
        folder: String,
        path: String,
    },
    FolderScanned {
        instance: String,
        folder: String,
        symlinks: usize,
        broken: usize,
    },
    BrokenSymlink {
        path: String,
        target: String,
        instance: String,
        category: Category,
    },
    ScanCompleted {
        instance: String,
        category: Category,
        total: usize,
        broken: usize,
        duration_seconds: f64,
    },

    // Deletion events
    SymlinkDeleted {
        path: String,
    },
    DeletionSkipped {
        path: String,
        reason: String,
    },
    DeletionFailed {
        path: String,
        error: String,
    },
    DeletionCompleted {
        deleted: usize,
        failed: usize,
        skipped: usize,
        api_triggered: usize,
    },

    // Reconciliation events
    ReconciliationSucceeded {
        path: String,
        instance: String,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        year: Option<u16>,
        item_id: i64,
    },
    ReconciliationFailed {
        path: String,
        instance: String,
        /// Pipeline step that failed (parse, locate, refresh, search)
        stage: String,
        error: String,
    },
}

impl ScanEvent {
    /// Get the event type as a string (matches the serialized tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            ScanEvent::ScanSessionStarted { .. } => "scan_session_started",
            ScanEvent::ScanSessionCompleted { .. } => "scan_session_completed",
            ScanEvent::Error { .. } => "error",
            ScanEvent::ScanStarted { .. } => "scan_started",
            ScanEvent::FolderSkipped { .. } => "folder_skipped",
            ScanEvent::FolderScanned { .. } => "folder_scanned",
            ScanEvent::BrokenSymlink { .. } => "broken_symlink",
            ScanEvent::ScanCompleted { .. } => "scan_completed",
            ScanEvent::SymlinkDeleted { .. } => "symlink_deleted",
            ScanEvent::DeletionSkipped { .. } => "deletion_skipped",
            ScanEvent::DeletionFailed { .. } => "deletion_failed",
            ScanEvent::DeletionCompleted { .. } => "deletion_completed",
            ScanEvent::ReconciliationSucceeded { .. } => "reconciliation_succeeded",
            ScanEvent::ReconciliationFailed { .. } => "reconciliation_failed",
        }
    }

    pub fn level(&self) -> EventLevel {
        match self {
            ScanEvent::Error { .. } | ScanEvent::DeletionFailed { .. } => EventLevel::Error,
            ScanEvent::BrokenSymlink { .. }
            | ScanEvent::FolderSkipped { .. }
            | ScanEvent::DeletionSkipped { .. }
            | ScanEvent::ReconciliationFailed { .. } => EventLevel::Warning,
            _ => EventLevel::Info,
        }
    }
}

/// A single line of the event log: `{timestamp, level, event, ...context}`.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord<'a> {
    pub timestamp: DateTime<Local>,
    pub level: EventLevel,
    #[serde(flatten)]
    pub event: &'a ScanEvent,
}

impl<'a> EventRecord<'a> {
    pub fn now(event: &'a ScanEvent) -> Self {
        Self {
            timestamp: Local::now(),
            level: event.level(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_matches_serialized_tag() {
        let events = vec![
            ScanEvent::ScanSessionStarted {
                mode: "dry-run".to_string(),
                auto_yes: false,
            },
            ScanEvent::BrokenSymlink {
                path: "/media/films/A (2020)/a.mkv".to_string(),
                target: "/mnt/movies/a.mkv".to_string(),
                instance: "radarr".to_string(),
                category: Category::Films,
            },
            ScanEvent::DeletionCompleted {
                deleted: 1,
                failed: 0,
                skipped: 0,
                api_triggered: 0,
            },
        ];

        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], event.event_type());
        }
    }

    #[test]
    fn test_record_has_timestamp_level_and_context() {
        let event = ScanEvent::DeletionFailed {
            path: "/media/x".to_string(),
            error: "Permission denied".to_string(),
        };
        let record = EventRecord::now(&event);
        let json = serde_json::to_value(&record).unwrap();

        assert!(json["timestamp"].is_string());
        assert_eq!(json["level"], "ERROR");
        assert_eq!(json["event"], "deletion_failed");
        assert_eq!(json["path"], "/media/x");
        assert_eq!(json["error"], "Permission denied");
    }

    #[test]
    fn test_levels() {
        let broken = ScanEvent::BrokenSymlink {
            path: String::new(),
            target: String::new(),
            instance: String::new(),
            category: Category::Series,
        };
        assert_eq!(broken.level(), EventLevel::Warning);

        let deleted = ScanEvent::SymlinkDeleted {
            path: String::new(),
        };
        assert_eq!(deleted.level(), EventLevel::Info);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let event = ScanEvent::ScanSessionCompleted {
            outcome: "no_broken_found".to_string(),
            broken_found: false,
            exit_code: 0,
            deleted: None,
            failed: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("deleted").is_none());
        assert_eq!(json["exit_code"], 0);
    }
}
