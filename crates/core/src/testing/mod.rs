//! Testing utilities and mock implementations.
//!
//! Mocks for the external collaborators of a session (catalog service,
//! event sink, confirmation prompt), so the pipeline can be exercised
//! against a temporary directory without any network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use danglr_core::testing::{fixtures, MockArrApi, RecordingSink};
//!
//! let api = MockArrApi::new();
//! api.add_item(CatalogKind::Movie, fixtures::catalog_item(1, "The Whale", Some(2022)));
//!
//! let sink = Arc::new(RecordingSink::new());
//! // Run a session...
//! assert_eq!(sink.count("symlink_deleted"), 1);
//! ```

mod mock_arr;
mod recording_sink;

pub use mock_arr::MockArrApi;
pub use recording_sink::RecordingSink;

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::session::Confirmer;

/// Confirmer that always gives the same answer and counts prompts.
#[derive(Debug, Default)]
pub struct FixedConfirmer {
    answer: bool,
    asked: AtomicUsize,
}

impl FixedConfirmer {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            ..Default::default()
        }
    }

    pub fn declining() -> Self {
        Self::default()
    }

    /// How many times the prompt was shown.
    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Confirmer for FixedConfirmer {
    fn confirm(&self, _total: usize) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    use crate::arr::CatalogItem;
    use crate::config::{Category, Config, Instance, ScanOptions};

    /// Create a catalog listing entry.
    pub fn catalog_item(id: i64, title: &str, year: Option<u16>) -> CatalogItem {
        CatalogItem {
            id,
            title: title.to_string(),
            year,
        }
    }

    /// Create an instance without API settings.
    pub fn instance(name: &str, category: Category, mount_path: &Path, folders: &[&str]) -> Instance {
        Instance {
            name: name.to_string(),
            category,
            mount_path: mount_path.to_path_buf(),
            media_folders: folders.iter().map(|f| f.to_string()).collect(),
            api_url: String::new(),
            api_key: String::new(),
        }
    }

    /// Create a config with JSON logging and syslog disabled.
    pub fn config(media_dir: &Path, instances: Vec<Instance>) -> Config {
        Config {
            media_dir: media_dir.to_path_buf(),
            log_dir: PathBuf::from("logs"),
            scan_options: ScanOptions {
                show_progress: false,
                syslog_logging: false,
                json_logging: false,
                ..ScanOptions::default()
            },
            instances,
        }
    }
}
