use std::path::PathBuf;
use std::time::Duration;

use crate::config::Category;

/// A symlink into the instance's mount whose target no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    /// Location of the symlink itself.
    pub path: PathBuf,
    /// Raw target read from the link, not normalized.
    pub target: PathBuf,
    pub instance: String,
    pub category: Category,
}

/// Result of scanning one instance.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub instance: String,
    pub category: Category,
    /// Every symlink examined, broken or not.
    pub total_checked: usize,
    /// Broken links in traversal order (folder order, then file-name order).
    pub broken_links: Vec<BrokenLink>,
    pub duration: Duration,
}

impl ScanResult {
    pub fn broken_count(&self) -> usize {
        self.broken_links.len()
    }
}

/// Outcome of classifying a single symlink against a mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// Raw target is not under the mount; ignored even if dangling.
    OutOfScope,
    /// Target is under the mount and resolves.
    Healthy,
    /// Target is under the mount and does not resolve.
    Broken { target: PathBuf },
    /// The link or its target could not be inspected; treated as not broken.
    Unreadable,
}
