//! Per-instance symlink scanner.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Instance;
use crate::events::{EventSink, ScanEvent};
use crate::report::Reporter;

use super::classify::classify;
use super::types::{BrokenLink, LinkStatus, ScanResult};

/// Walks an instance's media folders and classifies every symlink found.
///
/// The scanner never touches the filesystem beyond reading it, and never
/// fails: unreadable entries are logged and skipped.
pub struct Scanner {
    media_dir: PathBuf,
    sink: Arc<dyn EventSink>,
    reporter: Arc<dyn Reporter>,
}

impl Scanner {
    pub fn new(
        media_dir: impl Into<PathBuf>,
        sink: Arc<dyn EventSink>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            media_dir: media_dir.into(),
            sink,
            reporter,
        }
    }

    /// Scan every media folder of `instance`, in configuration order.
    pub fn scan(&self, instance: &Instance) -> ScanResult {
        let started = Instant::now();

        info!(
            "Scanning {} ({}), target mount {}",
            instance.name,
            instance.category,
            instance.mount_path.display()
        );
        self.reporter.on_instance_start(instance);
        self.sink.emit(ScanEvent::ScanStarted {
            instance: instance.name.clone(),
            category: instance.category,
            mount_path: instance.mount_path.display().to_string(),
        });

        let mut total_checked = 0;
        let mut broken_links = Vec::new();

        for folder in &instance.media_folders {
            let folder_path = self.media_dir.join(folder);

            if !folder_path.exists() {
                warn!("Skipping missing folder: {}", folder_path.display());
                self.reporter.on_folder_skipped(folder, &folder_path);
                self.sink.emit(ScanEvent::FolderSkipped {
                    instance: instance.name.clone(),
                    folder: folder.clone(),
                    path: folder_path.display().to_string(),
                });
                continue;
            }

            let links = collect_symlinks(&folder_path);
            debug!("{}: {} symlinks under {}", instance.name, links.len(), folder);
            self.reporter.on_folder_start(folder, links.len());

            let mut folder_broken = Vec::new();
            for link in links.iter() {
                total_checked += 1;
                if let LinkStatus::Broken { target } = classify(link, &instance.mount_path) {
                    debug!("Broken symlink: {} -> {}", link.display(), target.display());
                    self.sink.emit(ScanEvent::BrokenSymlink {
                        path: link.display().to_string(),
                        target: target.display().to_string(),
                        instance: instance.name.clone(),
                        category: instance.category,
                    });
                    folder_broken.push(BrokenLink {
                        path: link.clone(),
                        target,
                        instance: instance.name.clone(),
                        category: instance.category,
                    });
                }
                self.reporter.on_link_checked();
            }

            self.reporter
                .on_folder_complete(folder, links.len(), &folder_broken);
            self.sink.emit(ScanEvent::FolderScanned {
                instance: instance.name.clone(),
                folder: folder.clone(),
                symlinks: links.len(),
                broken: folder_broken.len(),
            });
            broken_links.extend(folder_broken);
        }

        let result = ScanResult {
            instance: instance.name.clone(),
            category: instance.category,
            total_checked,
            broken_links,
            duration: started.elapsed(),
        };

        info!(
            "{}: {} broken out of {} symlinks",
            instance.name,
            result.broken_count(),
            result.total_checked
        );
        self.reporter.on_instance_complete(&result);
        self.sink.emit(ScanEvent::ScanCompleted {
            instance: result.instance.clone(),
            category: result.category,
            total: result.total_checked,
            broken: result.broken_count(),
            duration_seconds: (result.duration.as_secs_f64() * 100.0).round() / 100.0,
        });

        result
    }
}

/// Every symlink below `root` (directory symlinks are listed, not followed),
/// sorted by file name at each level.
fn collect_symlinks(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Error walking {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.path_is_symlink())
        .map(|entry| entry.into_path())
        .collect()
}
