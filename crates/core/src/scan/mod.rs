//! Symlink scanning and classification.

mod classify;
mod scanner;
mod types;

pub use classify::{classify, is_broken};
pub use scanner::Scanner;
pub use types::{BrokenLink, LinkStatus, ScanResult};
