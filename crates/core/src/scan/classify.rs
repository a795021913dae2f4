//! Broken-link classification.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

use super::types::LinkStatus;

/// Classify `link` relative to `mount_path`.
///
/// Only the literal link target is compared against the mount, byte for byte;
/// intermediate components are never resolved. Errors while reading the link
/// or stat-ing its target fail open to [`LinkStatus::Unreadable`].
pub fn classify(link: &Path, mount_path: &Path) -> LinkStatus {
    let target = match fs::read_link(link) {
        Ok(target) => target,
        Err(e) => {
            warn!("Cannot read symlink {}: {}", link.display(), e);
            return LinkStatus::Unreadable;
        }
    };

    if !target
        .as_os_str()
        .as_encoded_bytes()
        .starts_with(mount_path.as_os_str().as_encoded_bytes())
    {
        return LinkStatus::OutOfScope;
    }

    match fs::metadata(link) {
        Ok(_) => LinkStatus::Healthy,
        Err(e) if target_missing(&e) => LinkStatus::Broken { target },
        Err(e) => {
            warn!("Cannot resolve symlink {}: {}", link.display(), e);
            LinkStatus::Unreadable
        }
    }
}

/// Whether `link` is a broken symlink into `mount_path`.
pub fn is_broken(link: &Path, mount_path: &Path) -> bool {
    matches!(classify(link, mount_path), LinkStatus::Broken { .. })
}

/// The target does not exist: missing, through a non-directory, or a loop.
fn target_missing(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) || is_loop(err)
}

#[cfg(unix)]
fn is_loop(err: &std::io::Error) -> bool {
    err.raw_os_error() == Some(libc::ELOOP)
}

#[cfg(not(unix))]
fn is_loop(_err: &std::io::Error) -> bool {
    false
}
