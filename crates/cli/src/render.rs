//! Console renderers for a session.
//!
//! - `RichReporter`: progress bars and styled output, for terminals
//! - `PlainReporter`: one log line per step, for pipes and cron

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use danglr_core::config::Instance;
use danglr_core::{BrokenLink, DeletionOutcome, Reporter, RunMode, ScanResult};

const DRY_RUN_HINT: &str =
    "Dry run, nothing deleted. Rerun with --execute to delete (add --yes to skip the prompt).";

/// Progress bars on stderr via indicatif.
pub struct RichReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl RichReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn inc(&self) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(1);
            }
        }
    }

    /// Print above the active bar, if any.
    fn println(&self, line: impl AsRef<str>) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.println(line);
                return;
            }
        }
        eprintln!("{}", line.as_ref());
    }

    fn bar(len: usize, label: &str) -> ProgressBar {
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner:.cyan} {msg} [{bar:30.cyan/dim}] {pos}/{len}",
        ) {
            pb.set_style(style.progress_chars("━╸─").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(label.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

impl Default for RichReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for RichReporter {
    fn on_session_start(&self, mode: RunMode) {
        let mode = match mode {
            RunMode::DryRun => style(mode.as_str()).yellow(),
            RunMode::Execute => style(mode.as_str()).red(),
        };
        eprintln!("{} ({})", style("Broken symlink scan").bold(), mode.bold());
    }

    fn on_prerequisites_ok(&self) {
        eprintln!("  {} Media directory and mounts OK", style("✓").green());
    }

    fn on_instance_start(&self, instance: &Instance) {
        eprintln!();
        eprintln!(
            "{} {} {}",
            style(&instance.name).bold().cyan(),
            style(instance.category).dim(),
            style(format!("→ {}", instance.mount_path.display())).dim()
        );
    }

    fn on_folder_skipped(&self, folder: &str, _path: &Path) {
        eprintln!("  {} {}: not found", style("-").dim(), style(folder).dim());
    }

    fn on_folder_start(&self, folder: &str, symlinks: usize) {
        self.set_bar(Self::bar(symlinks, folder));
    }

    fn on_link_checked(&self) {
        self.inc();
    }

    fn on_folder_complete(&self, folder: &str, symlinks: usize, broken: &[BrokenLink]) {
        self.finish_bar();
        if broken.is_empty() {
            eprintln!(
                "  {} {}: {} symlinks",
                style("✓").green(),
                folder,
                symlinks
            );
            return;
        }

        eprintln!(
            "  {} {}: {} symlinks, {}",
            style("✗").red(),
            folder,
            symlinks,
            style(format!("{} broken", broken.len())).red().bold()
        );
        for link in broken {
            eprintln!(
                "      {} {}",
                link.path.display(),
                style(format!("→ {}", link.target.display())).dim()
            );
        }
    }

    fn on_instance_complete(&self, result: &ScanResult) {
        eprintln!(
            "  {}",
            style(format!(
                "{} checked, {} broken in {:.2}s",
                result.total_checked,
                result.broken_count(),
                result.duration.as_secs_f64()
            ))
            .dim()
        );
    }

    fn on_summary(&self, results: &[ScanResult], mode: RunMode) {
        let name_width = results
            .iter()
            .map(|r| r.instance.len())
            .chain(std::iter::once("Instance".len()))
            .max()
            .unwrap_or(8);

        eprintln!();
        eprintln!(
            "{}",
            style(format!(
                "{:<w$}  {:<8}  {:>8}  {:>6}",
                "Instance",
                "Category",
                "Checked",
                "Broken",
                w = name_width
            ))
            .bold()
            .underlined()
        );

        let mut checked = 0;
        let mut broken = 0;
        for result in results {
            checked += result.total_checked;
            broken += result.broken_count();
            let count = format!("{:>6}", result.broken_count());
            let count = if result.broken_count() > 0 {
                style(count).red()
            } else {
                style(count).green()
            };
            eprintln!(
                "{:<w$}  {:<8}  {:>8}  {}",
                result.instance,
                result.category.as_str(),
                result.total_checked,
                count,
                w = name_width
            );
        }
        eprintln!(
            "{}",
            style(format!(
                "{:<w$}  {:<8}  {:>8}  {:>6}",
                "Total",
                "",
                checked,
                broken,
                w = name_width
            ))
            .bold()
        );

        if broken > 0 && mode.is_dry_run() {
            eprintln!();
            eprintln!("{}", style(DRY_RUN_HINT).yellow());
        }
    }

    fn on_deletion_start(&self, total: usize) {
        eprintln!();
        self.set_bar(Self::bar(total, "Deleting"));
    }

    fn on_link_deleted(&self, path: &Path) {
        self.println(format!("  {} {}", style("✓").green(), path.display()));
        self.inc();
    }

    fn on_link_skipped(&self, path: &Path) {
        self.println(format!(
            "  {} {} {}",
            style("-").yellow(),
            path.display(),
            style("(no longer a symlink)").dim()
        ));
        self.inc();
    }

    fn on_link_failed(&self, path: &Path, error: &str) {
        self.println(format!(
            "  {} {} {}",
            style("✗").red(),
            path.display(),
            style(error).red()
        ));
        self.inc();
    }

    fn on_deletion_complete(&self, outcome: &DeletionOutcome) {
        self.finish_bar();
        let failed = if outcome.failed > 0 {
            style(format!("{} failed", outcome.failed)).red().bold()
        } else {
            style(format!("{} failed", outcome.failed)).dim()
        };
        eprintln!(
            "{} {} deleted, {}, {} skipped, {} catalog actions",
            style("Deletion complete:").bold(),
            style(outcome.deleted).green(),
            failed,
            outcome.skipped,
            outcome.reconciled
        );
    }
}

/// Plain log lines through tracing.
pub struct PlainReporter;

impl Reporter for PlainReporter {
    fn on_folder_skipped(&self, folder: &str, path: &Path) {
        info!("{}: folder not found ({})", folder, path.display());
    }

    fn on_folder_complete(&self, folder: &str, symlinks: usize, broken: &[BrokenLink]) {
        info!("{}: {} symlinks, {} broken", folder, symlinks, broken.len());
        for link in broken {
            warn!("BROKEN: {} -> {}", link.path.display(), link.target.display());
        }
    }

    fn on_summary(&self, results: &[ScanResult], mode: RunMode) {
        let mut broken = 0;
        for result in results {
            broken += result.broken_count();
            info!(
                "Summary {}: {} checked, {} broken",
                result.instance,
                result.total_checked,
                result.broken_count()
            );
        }
        info!("Total broken symlinks: {}", broken);

        if broken > 0 && mode.is_dry_run() {
            info!("{}", DRY_RUN_HINT);
        }
    }
}
