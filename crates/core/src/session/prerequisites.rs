//! Checks that must pass before anything is scanned.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Fatal prerequisite failures.
#[derive(Debug, Error)]
pub enum PrerequisiteError {
    #[error("Media directory not found: {path}")]
    MediaDirMissing { path: PathBuf },

    #[error("[{instance}] Mount not found: {path}")]
    MountMissing { instance: String, path: PathBuf },

    #[error("[{instance}] Mount not readable: {path}: {source}")]
    MountUnreadable {
        instance: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PrerequisiteError {
    /// Machine readable reason recorded in the event log.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MediaDirMissing { .. } => "media_dir_missing",
            Self::MountMissing { .. } => "mount_missing",
            Self::MountUnreadable { .. } => "mount_permission_denied",
        }
    }

    pub fn instance(&self) -> Option<&str> {
        match self {
            Self::MediaDirMissing { .. } => None,
            Self::MountMissing { instance, .. } | Self::MountUnreadable { instance, .. } => {
                Some(instance)
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::MediaDirMissing { path }
            | Self::MountMissing { path, .. }
            | Self::MountUnreadable { path, .. } => path,
        }
    }
}

/// Verify the media dir and every instance mount before scanning.
///
/// Stops at the first failure. A mount path that is not an actual mount point
/// only produces a warning.
pub fn check_prerequisites(config: &Config) -> Result<(), PrerequisiteError> {
    if !config.media_dir.is_dir() {
        return Err(PrerequisiteError::MediaDirMissing {
            path: config.media_dir.clone(),
        });
    }

    for instance in &config.instances {
        let mount = &instance.mount_path;

        match fs::read_dir(mount) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PrerequisiteError::MountMissing {
                    instance: instance.name.clone(),
                    path: mount.clone(),
                });
            }
            Err(source) => {
                return Err(PrerequisiteError::MountUnreadable {
                    instance: instance.name.clone(),
                    path: mount.clone(),
                    source,
                });
            }
        }

        if is_mount_point(mount) {
            debug!("[{}] Mount OK: {}", instance.name, mount.display());
        } else {
            warn!("[{}] {} is not a mount point", instance.name, mount.display());
        }
    }

    Ok(())
}

/// Whether `path` is the root of a mounted filesystem.
#[cfg(unix)]
pub fn is_mount_point(path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    if path == Path::new("/") {
        return true;
    }
    let Some(parent) = path.parent() else {
        return true;
    };
    match (fs::metadata(path), fs::metadata(parent)) {
        (Ok(own), Ok(up)) => own.dev() != up.dev(),
        _ => false,
    }
}

/// Mount detection is unix only; elsewhere every path is accepted.
#[cfg(not(unix))]
pub fn is_mount_point(_path: &Path) -> bool {
    true
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::Category;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_all_present() {
        let dir = TempDir::new().unwrap();
        let mount = dir.path().join("mount");
        fs::create_dir(&mount).unwrap();
        let config = fixtures::config(
            dir.path(),
            vec![fixtures::instance("radarr", Category::Films, &mount, &["films"])],
        );

        assert!(check_prerequisites(&config).is_ok());
    }

    #[test]
    fn test_media_dir_missing() {
        let dir = TempDir::new().unwrap();
        let config = fixtures::config(&dir.path().join("nope"), vec![]);

        let err = check_prerequisites(&config).unwrap_err();
        assert_eq!(err.reason(), "media_dir_missing");
        assert!(err.instance().is_none());
    }

    #[test]
    fn test_mount_missing() {
        let dir = TempDir::new().unwrap();
        let mount = dir.path().join("gone");
        let config = fixtures::config(
            dir.path(),
            vec![fixtures::instance("sonarr", Category::Series, &mount, &["series"])],
        );

        let err = check_prerequisites(&config).unwrap_err();
        assert_eq!(err.reason(), "mount_missing");
        assert_eq!(err.instance(), Some("sonarr"));
        assert_eq!(err.path(), mount.as_path());
    }

    #[test]
    fn test_mount_unreadable() {
        let dir = TempDir::new().unwrap();
        let mount = dir.path().join("not-a-dir");
        fs::write(&mount, b"plain file").unwrap();

        let config = fixtures::config(
            dir.path(),
            vec![fixtures::instance("radarr", Category::Films, &mount, &["films"])],
        );

        let err = check_prerequisites(&config).unwrap_err();
        assert!(matches!(err, PrerequisiteError::MountUnreadable { .. }));
        assert_eq!(err.reason(), "mount_permission_denied");
        assert_eq!(err.instance(), Some("radarr"));
    }

    #[test]
    fn test_root_is_mount_point() {
        assert!(is_mount_point(Path::new("/")));
    }

    #[test]
    fn test_plain_subdirectory_is_not_mount_point() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        assert!(!is_mount_point(&sub));
    }
}
