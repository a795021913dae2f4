//! Types for the session controller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clean::DeletionOutcome;
use crate::scan::ScanResult;

/// Whether a session may delete anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    #[default]
    DryRun,
    Execute,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::DryRun => "dry-run",
            RunMode::Execute => "execute",
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, RunMode::DryRun)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    PrerequisitesFailed,
    NoBrokenFound,
    /// Dry-run found broken links.
    BrokenPendingConfirmation,
    BrokenUserDeclined,
    DeletionSucceeded,
    DeletionHadFailures,
}

impl SessionOutcome {
    /// Process exit code for this state.
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionOutcome::NoBrokenFound => 0,
            SessionOutcome::PrerequisitesFailed | SessionOutcome::DeletionHadFailures => 1,
            SessionOutcome::BrokenPendingConfirmation | SessionOutcome::BrokenUserDeclined => 2,
            SessionOutcome::DeletionSucceeded => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionOutcome::PrerequisitesFailed => "prerequisites_failed",
            SessionOutcome::NoBrokenFound => "no_broken_found",
            SessionOutcome::BrokenPendingConfirmation => "broken_pending_confirmation",
            SessionOutcome::BrokenUserDeclined => "broken_user_declined",
            SessionOutcome::DeletionSucceeded => "deletion_succeeded",
            SessionOutcome::DeletionHadFailures => "deletion_had_failures",
        }
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a finished session produced.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    /// Per-instance scan results, empty when prerequisites failed.
    pub results: Vec<ScanResult>,
    /// Present only when a deletion pass ran.
    pub deletion: Option<DeletionOutcome>,
}

impl SessionReport {
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }

    pub fn total_broken(&self) -> usize {
        self.results.iter().map(|r| r.broken_count()).sum()
    }
}
