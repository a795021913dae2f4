//! Session controller.
//!
//! Sequences one run: prerequisites, scan of every instance, summary,
//! optional confirmation, deletion. Each run ends in exactly one
//! [`SessionOutcome`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::arr::ArrApi;
use crate::clean::{Cleaner, DeletionOutcome};
use crate::config::Config;
use crate::events::{EventSink, ScanEvent};
use crate::reconcile::Reconciler;
use crate::report::Reporter;
use crate::scan::{ScanResult, Scanner};

use super::prerequisites::check_prerequisites;
use super::types::{RunMode, SessionOutcome, SessionReport};

/// Asks the operator whether to delete the broken links found.
///
/// Implementations return `false` on any I/O problem.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, total: usize) -> bool;
}

/// One scan-and-maybe-delete run over every configured instance.
pub struct Session {
    config: Config,
    mode: RunMode,
    auto_yes: bool,
    sink: Arc<dyn EventSink>,
    reporter: Arc<dyn Reporter>,
    confirmer: Arc<dyn Confirmer>,
    /// Catalog clients supplied by the caller, keyed by instance name.
    apis: HashMap<String, Arc<dyn ArrApi>>,
}

impl Session {
    pub fn new(
        config: Config,
        mode: RunMode,
        auto_yes: bool,
        sink: Arc<dyn EventSink>,
        reporter: Arc<dyn Reporter>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self {
            config,
            mode,
            auto_yes,
            sink,
            reporter,
            confirmer,
            apis: HashMap::new(),
        }
    }

    /// Use `api` instead of an HTTP client for `instance`.
    pub fn with_api(mut self, instance: impl Into<String>, api: Arc<dyn ArrApi>) -> Self {
        self.apis.insert(instance.into(), api);
        self
    }

    /// Run the session to completion.
    pub async fn run(&self) -> SessionReport {
        info!("Session started: mode={} auto_yes={}", self.mode, self.auto_yes);
        self.reporter.on_session_start(self.mode);
        self.sink.emit(ScanEvent::ScanSessionStarted {
            mode: self.mode.as_str().to_string(),
            auto_yes: self.auto_yes,
        });

        if let Err(e) = check_prerequisites(&self.config) {
            error!("{}", e);
            self.sink.emit(ScanEvent::Error {
                message: e.reason().to_string(),
                instance: e.instance().map(str::to_string),
                path: e.path().display().to_string(),
            });
            return self.finish(SessionOutcome::PrerequisitesFailed, Vec::new(), None);
        }
        self.reporter.on_prerequisites_ok();

        let results = self.scan_all();
        self.reporter.on_summary(&results, self.mode);

        let total: usize = results.iter().map(|r| r.broken_count()).sum();
        if total == 0 {
            info!("No broken symlinks found");
            return self.finish(SessionOutcome::NoBrokenFound, results, None);
        }

        if self.mode.is_dry_run() {
            info!("Dry-run: {} broken symlinks left in place", total);
            return self.finish(SessionOutcome::BrokenPendingConfirmation, results, None);
        }

        if !self.auto_yes && !self.confirmer.confirm(total) {
            info!("Deletion cancelled by user");
            return self.finish(SessionOutcome::BrokenUserDeclined, results, None);
        }

        let reconcilers = self.build_reconcilers();
        let cleaner = Cleaner::new(self.sink.clone(), self.reporter.clone());
        let deletion = cleaner.delete(&results, &reconcilers).await;

        let outcome = if deletion.has_failures() {
            SessionOutcome::DeletionHadFailures
        } else {
            SessionOutcome::DeletionSucceeded
        };
        self.finish(outcome, results, Some(deletion))
    }

    fn scan_all(&self) -> Vec<ScanResult> {
        let scanner = Scanner::new(
            &self.config.media_dir,
            self.sink.clone(),
            self.reporter.clone(),
        );
        self.config
            .instances
            .iter()
            .map(|instance| scanner.scan(instance))
            .collect()
    }

    /// One reconciler per instance with API settings, if API actions are enabled.
    fn build_reconcilers(&self) -> HashMap<String, Reconciler> {
        let mut reconcilers = HashMap::new();
        if !self.config.scan_options.enable_api_actions {
            return reconcilers;
        }

        for instance in &self.config.instances {
            if !instance.has_api() {
                continue;
            }

            let reconciler = match self.apis.get(&instance.name) {
                Some(api) => Reconciler::new(api.clone(), instance.name.clone(), instance.category),
                None => match Reconciler::for_instance(instance) {
                    Ok(reconciler) => reconciler,
                    Err(e) => {
                        warn!("[{}] Catalog actions disabled: {}", instance.name, e);
                        continue;
                    }
                },
            };
            reconcilers.insert(instance.name.clone(), reconciler);
        }

        info!("Catalog actions enabled for {} instances", reconcilers.len());
        reconcilers
    }

    fn finish(
        &self,
        outcome: SessionOutcome,
        results: Vec<ScanResult>,
        deletion: Option<DeletionOutcome>,
    ) -> SessionReport {
        let report = SessionReport {
            outcome,
            results,
            deletion,
        };

        info!(
            "Session finished: {} (exit code {})",
            outcome,
            outcome.exit_code()
        );
        self.sink.emit(ScanEvent::ScanSessionCompleted {
            outcome: outcome.as_str().to_string(),
            broken_found: report.total_broken() > 0,
            exit_code: outcome.exit_code(),
            deleted: deletion.map(|d| d.deleted),
            failed: deletion.map(|d| d.failed),
        });

        report
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::Category;
    use crate::report::SilentReporter;
    use crate::testing::{fixtures, FixedConfirmer, RecordingSink};
    use std::fs;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    struct Setup {
        dir: TempDir,
        config: Config,
    }

    /// Media dir with one healthy and one broken link under `films`.
    fn setup() -> Setup {
        let dir = TempDir::new().unwrap();
        let media = dir.path().join("media");
        let mount = dir.path().join("mount");
        fs::create_dir_all(media.join("films/Alien (1979)")).unwrap();
        fs::create_dir_all(media.join("films/The Whale (2022)")).unwrap();
        fs::create_dir_all(mount.join("Alien")).unwrap();
        fs::write(mount.join("Alien/alien.mkv"), b"x").unwrap();

        symlink(
            mount.join("Alien/alien.mkv"),
            media.join("films/Alien (1979)/alien.mkv"),
        )
        .unwrap();
        symlink(
            mount.join("Whale/whale.mkv"),
            media.join("films/The Whale (2022)/whale.mkv"),
        )
        .unwrap();

        let config = fixtures::config(
            &media,
            vec![fixtures::instance("radarr", Category::Films, &mount, &["films"])],
        );
        Setup { dir, config }
    }

    fn session(
        config: Config,
        mode: RunMode,
        auto_yes: bool,
        sink: Arc<RecordingSink>,
        confirmer: Arc<FixedConfirmer>,
    ) -> Session {
        Session::new(config, mode, auto_yes, sink, Arc::new(SilentReporter), confirmer)
    }

    fn whale_link(setup: &Setup) -> std::path::PathBuf {
        setup.config.media_dir.join("films/The Whale (2022)/whale.mkv")
    }

    #[tokio::test]
    async fn test_dry_run_leaves_links() {
        let setup = setup();
        let sink = Arc::new(RecordingSink::new());
        let confirmer = Arc::new(FixedConfirmer::accepting());

        let report = session(
            setup.config.clone(),
            RunMode::DryRun,
            false,
            sink.clone(),
            confirmer.clone(),
        )
        .run()
        .await;

        assert_eq!(report.outcome, SessionOutcome::BrokenPendingConfirmation);
        assert_eq!(report.exit_code(), 2);
        assert!(report.deletion.is_none());
        assert_eq!(confirmer.times_asked(), 0);
        assert!(whale_link(&setup).symlink_metadata().is_ok());
        assert_eq!(sink.count("symlink_deleted"), 0);
    }

    #[tokio::test]
    async fn test_user_declines() {
        let setup = setup();
        let confirmer = Arc::new(FixedConfirmer::declining());

        let report = session(
            setup.config.clone(),
            RunMode::Execute,
            false,
            Arc::new(RecordingSink::new()),
            confirmer.clone(),
        )
        .run()
        .await;

        assert_eq!(report.outcome, SessionOutcome::BrokenUserDeclined);
        assert_eq!(report.exit_code(), 2);
        assert_eq!(confirmer.times_asked(), 1);
        assert!(whale_link(&setup).symlink_metadata().is_ok());
    }

    #[tokio::test]
    async fn test_confirmed_deletion() {
        let setup = setup();
        let confirmer = Arc::new(FixedConfirmer::accepting());

        let report = session(
            setup.config.clone(),
            RunMode::Execute,
            false,
            Arc::new(RecordingSink::new()),
            confirmer.clone(),
        )
        .run()
        .await;

        assert_eq!(report.outcome, SessionOutcome::DeletionSucceeded);
        assert_eq!(report.exit_code(), 3);
        assert_eq!(report.deletion.unwrap().deleted, 1);
        assert!(whale_link(&setup).symlink_metadata().is_err());
        assert!(setup
            .config
            .media_dir
            .join("films/Alien (1979)/alien.mkv")
            .symlink_metadata()
            .is_ok());
    }

    /// Accepts, after turning the broken link's folder into a regular file.
    struct FolderReplacingConfirmer {
        folder: std::path::PathBuf,
    }

    impl Confirmer for FolderReplacingConfirmer {
        fn confirm(&self, _total: usize) -> bool {
            fs::remove_dir_all(&self.folder).unwrap();
            fs::write(&self.folder, b"not a directory").unwrap();
            true
        }
    }

    #[tokio::test]
    async fn test_deletion_failure_exits_1() {
        let setup = setup();
        let folder = setup.config.media_dir.join("films/The Whale (2022)");
        let sink = Arc::new(RecordingSink::new());

        let report = Session::new(
            setup.config.clone(),
            RunMode::Execute,
            false,
            sink.clone(),
            Arc::new(SilentReporter),
            Arc::new(FolderReplacingConfirmer { folder }),
        )
        .run()
        .await;

        assert_eq!(report.outcome, SessionOutcome::DeletionHadFailures);
        assert_eq!(report.exit_code(), 1);
        let deletion = report.deletion.unwrap();
        assert_eq!(deletion.failed, 1);
        assert_eq!(deletion.deleted, 0);
        assert_eq!(sink.count("deletion_failed"), 1);
        assert_eq!(
            sink.events().pop().unwrap(),
            ScanEvent::ScanSessionCompleted {
                outcome: "deletion_had_failures".to_string(),
                broken_found: true,
                exit_code: 1,
                deleted: Some(0),
                failed: Some(1),
            }
        );
    }

    #[tokio::test]
    async fn test_auto_yes_skips_prompt() {
        let setup = setup();
        let confirmer = Arc::new(FixedConfirmer::declining());

        let report = session(
            setup.config.clone(),
            RunMode::Execute,
            true,
            Arc::new(RecordingSink::new()),
            confirmer.clone(),
        )
        .run()
        .await;

        assert_eq!(report.outcome, SessionOutcome::DeletionSucceeded);
        assert_eq!(confirmer.times_asked(), 0);
    }

    #[tokio::test]
    async fn test_no_broken_found() {
        let setup = setup();
        fs::remove_file(whale_link(&setup)).unwrap();
        let sink = Arc::new(RecordingSink::new());

        let report = session(
            setup.config.clone(),
            RunMode::Execute,
            true,
            sink.clone(),
            Arc::new(FixedConfirmer::accepting()),
        )
        .run()
        .await;

        assert_eq!(report.outcome, SessionOutcome::NoBrokenFound);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(sink.count("deletion_completed"), 0);
    }

    #[tokio::test]
    async fn test_missing_mount_fails_before_scan() {
        let setup = setup();
        let mut config = setup.config.clone();
        config.instances[0].mount_path = setup.dir.path().join("unmounted");
        let sink = Arc::new(RecordingSink::new());

        let report = session(
            config,
            RunMode::Execute,
            true,
            sink.clone(),
            Arc::new(FixedConfirmer::accepting()),
        )
        .run()
        .await;

        assert_eq!(report.outcome, SessionOutcome::PrerequisitesFailed);
        assert_eq!(report.exit_code(), 1);
        assert!(report.results.is_empty());
        assert_eq!(
            sink.event_types(),
            vec!["scan_session_started", "error", "scan_session_completed"]
        );
        assert!(whale_link(&setup).symlink_metadata().is_ok());
    }

    #[tokio::test]
    async fn test_reconcilers_require_api_actions() {
        let setup = setup();
        let mut config = setup.config.clone();
        config.instances[0].api_url = "http://localhost:7878".to_string();
        config.instances[0].api_key = "key".to_string();

        let api = crate::testing::MockArrApi::new();
        let s = session(
            config.clone(),
            RunMode::Execute,
            true,
            Arc::new(RecordingSink::new()),
            Arc::new(FixedConfirmer::accepting()),
        )
        .with_api("radarr", Arc::new(api.clone()));
        assert!(s.build_reconcilers().is_empty());

        config.scan_options.enable_api_actions = true;
        let s = session(
            config,
            RunMode::Execute,
            true,
            Arc::new(RecordingSink::new()),
            Arc::new(FixedConfirmer::accepting()),
        )
        .with_api("radarr", Arc::new(api));
        assert!(s.build_reconcilers().contains_key("radarr"));
    }

    #[tokio::test]
    async fn test_session_completed_event() {
        let setup = setup();
        let sink = Arc::new(RecordingSink::new());

        session(
            setup.config.clone(),
            RunMode::Execute,
            true,
            sink.clone(),
            Arc::new(FixedConfirmer::accepting()),
        )
        .run()
        .await;

        let last = sink.events().pop().unwrap();
        assert_eq!(
            last,
            ScanEvent::ScanSessionCompleted {
                outcome: "deletion_succeeded".to_string(),
                broken_found: true,
                exit_code: 3,
                deleted: Some(1),
                failed: Some(0),
            }
        );
    }
}
