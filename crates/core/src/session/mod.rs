//! Session controller: one run from prerequisite checks to exit code.

mod prerequisites;
mod runner;
mod types;

pub use prerequisites::{check_prerequisites, is_mount_point, PrerequisiteError};
pub use runner::{Confirmer, Session};
pub use types::{RunMode, SessionOutcome, SessionReport};
