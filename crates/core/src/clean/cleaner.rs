//! Guarded deletion of broken links.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::events::{EventSink, ScanEvent};
use crate::reconcile::Reconciler;
use crate::report::Reporter;
use crate::scan::{BrokenLink, ScanResult};

use super::error::DeletionError;

/// Aggregate result of a deletion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub deleted: usize,
    pub failed: usize,
    /// Paths that were no longer symlinks when their turn came.
    pub skipped: usize,
    /// Deleted links whose reconciliation pipeline completed.
    pub reconciled: usize,
}

impl DeletionOutcome {
    pub fn processed(&self) -> usize {
        self.deleted + self.failed + self.skipped
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// What happened to a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    Deleted,
    /// Already gone, or replaced by something that is not a symlink.
    NotASymlink,
}

/// Deletes broken links and notifies the owning instance's catalog service.
pub struct Cleaner {
    sink: Arc<dyn EventSink>,
    reporter: Arc<dyn Reporter>,
}

impl Cleaner {
    pub fn new(sink: Arc<dyn EventSink>, reporter: Arc<dyn Reporter>) -> Self {
        Self { sink, reporter }
    }

    /// Delete every broken link in scan order.
    ///
    /// `reconcilers` is keyed by instance name; instances without an entry are
    /// only cleaned. Per-link failures are counted and never abort the pass.
    pub async fn delete(
        &self,
        results: &[ScanResult],
        reconcilers: &HashMap<String, Reconciler>,
    ) -> DeletionOutcome {
        let total: usize = results.iter().map(|r| r.broken_count()).sum();
        info!("Deleting {} broken symlinks", total);
        self.reporter.on_deletion_start(total);

        let mut outcome = DeletionOutcome::default();

        for result in results {
            let reconciler = reconcilers.get(&result.instance);

            for link in &result.broken_links {
                match remove_symlink(&link.path) {
                    Ok(Removal::Deleted) => {
                        outcome.deleted += 1;
                        info!("Deleted: {}", link.path.display());
                        self.reporter.on_link_deleted(&link.path);
                        self.sink.emit(ScanEvent::SymlinkDeleted {
                            path: link.path.display().to_string(),
                        });

                        if let Some(reconciler) = reconciler {
                            if self.reconcile(reconciler, link).await {
                                outcome.reconciled += 1;
                            }
                        }
                    }
                    Ok(Removal::NotASymlink) => {
                        outcome.skipped += 1;
                        warn!("Skipped (no longer a symlink): {}", link.path.display());
                        self.reporter.on_link_skipped(&link.path);
                        self.sink.emit(ScanEvent::DeletionSkipped {
                            path: link.path.display().to_string(),
                            reason: "not_a_symlink".to_string(),
                        });
                    }
                    Err(e) => {
                        outcome.failed += 1;
                        error!("{}", e);
                        self.reporter.on_link_failed(&link.path, &e.to_string());
                        self.sink.emit(ScanEvent::DeletionFailed {
                            path: link.path.display().to_string(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            "Deletion finished: {} deleted, {} failed, {} skipped",
            outcome.deleted, outcome.failed, outcome.skipped
        );
        if outcome.reconciled > 0 {
            info!("Catalog actions triggered for {} items", outcome.reconciled);
        }
        self.reporter.on_deletion_complete(&outcome);
        self.sink.emit(ScanEvent::DeletionCompleted {
            deleted: outcome.deleted,
            failed: outcome.failed,
            skipped: outcome.skipped,
            api_triggered: outcome.reconciled,
        });

        outcome
    }

    async fn reconcile(&self, reconciler: &Reconciler, link: &BrokenLink) -> bool {
        match reconciler.reconcile(&link.path).await {
            Ok(target) => {
                info!(
                    "[{}] Catalog actions triggered for {}",
                    reconciler.instance(),
                    link.path.display()
                );
                self.sink.emit(ScanEvent::ReconciliationSucceeded {
                    path: link.path.display().to_string(),
                    instance: link.instance.clone(),
                    title: target.title,
                    year: target.year,
                    item_id: target.item_id,
                });
                true
            }
            Err(e) => {
                error!(
                    "[{}] Reconciliation failed for {}: {}",
                    reconciler.instance(),
                    link.path.display(),
                    e
                );
                self.sink.emit(ScanEvent::ReconciliationFailed {
                    path: link.path.display().to_string(),
                    instance: link.instance.clone(),
                    stage: e.stage().to_string(),
                    error: e.to_string(),
                });
                false
            }
        }
    }
}

/// Unlink `path` only if it is still a symlink.
fn remove_symlink(path: &Path) -> Result<Removal, DeletionError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {}
        Ok(_) => return Ok(Removal::NotASymlink),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Removal::NotASymlink),
        Err(source) => {
            return Err(DeletionError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    fs::remove_file(path).map_err(|source| DeletionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Removal::Deleted)
}
