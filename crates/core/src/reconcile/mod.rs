//! Reconciliation of deleted links with Radarr/Sonarr.

mod error;
mod parse;
mod reconciler;

pub use error::{ReconcileError, ReconcileStage};
pub use parse::parse_folder_name;
pub use reconciler::{ReconciliationTarget, Reconciler};
