//! Deletion of broken links.

mod cleaner;
mod error;

pub use cleaner::{Cleaner, DeletionOutcome};
pub use error::DeletionError;
