use std::path::Path;

use crate::clean::DeletionOutcome;
use crate::config::Instance;
use crate::scan::{BrokenLink, ScanResult};
use crate::session::RunMode;

/// Console rendering hooks.
///
/// The CLI provides a rich (progress bars) and a plain implementation and picks
/// one at startup. All methods have default no-op implementations.
pub trait Reporter: Send + Sync {
    fn on_session_start(&self, _mode: RunMode) {}
    fn on_prerequisites_ok(&self) {}
    fn on_instance_start(&self, _instance: &Instance) {}
    fn on_folder_skipped(&self, _folder: &str, _path: &Path) {}
    fn on_folder_start(&self, _folder: &str, _symlinks: usize) {}
    fn on_link_checked(&self) {}
    fn on_folder_complete(&self, _folder: &str, _symlinks: usize, _broken: &[BrokenLink]) {}
    fn on_instance_complete(&self, _result: &ScanResult) {}
    fn on_summary(&self, _results: &[ScanResult], _mode: RunMode) {}
    fn on_deletion_start(&self, _total: usize) {}
    fn on_link_deleted(&self, _path: &Path) {}
    fn on_link_skipped(&self, _path: &Path) {}
    fn on_link_failed(&self, _path: &Path, _error: &str) {}
    fn on_deletion_complete(&self, _outcome: &DeletionOutcome) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl Reporter for SilentReporter {}
