//! Error types for the reconcile module.

use std::fmt;

use thiserror::Error;

use crate::arr::ArrError;

/// Reconciliation pipeline steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStage {
    Parse,
    Locate,
    Refresh,
    Search,
}

impl ReconcileStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileStage::Parse => "parse",
            ReconcileStage::Locate => "locate",
            ReconcileStage::Refresh => "refresh",
            ReconcileStage::Search => "search",
        }
    }
}

impl fmt::Display for ReconcileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort the reconciliation pipeline.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Folder name yielded no title.
    #[error("Cannot parse a title from folder '{folder}'")]
    Parse { folder: String },

    /// Films are matched on year, and the folder has none.
    #[error("No year in folder name for '{title}'")]
    MissingYear { title: String },

    /// No catalog entry matches.
    #[error("No catalog entry for '{title}'{}", .year.map(|y| format!(" ({})", y)).unwrap_or_default())]
    NotFound { title: String, year: Option<u16> },

    /// A request to the catalog service failed.
    #[error("{stage} request failed: {source}")]
    Api {
        stage: ReconcileStage,
        #[source]
        source: ArrError,
    },
}

impl ReconcileError {
    /// Step at which the pipeline stopped.
    pub fn stage(&self) -> ReconcileStage {
        match self {
            Self::Parse { .. } | Self::MissingYear { .. } => ReconcileStage::Parse,
            Self::NotFound { .. } => ReconcileStage::Locate,
            Self::Api { stage, .. } => *stage,
        }
    }

    pub(crate) fn api(stage: ReconcileStage) -> impl FnOnce(ArrError) -> Self {
        move |source| Self::Api { stage, source }
    }
}
