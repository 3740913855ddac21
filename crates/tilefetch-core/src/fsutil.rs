//! Filesystem helpers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Recreates `path` as an empty directory (parents included).
///
/// An existing directory is removed with everything beneath it first. An
/// "already exists" error from creation is ignored; any other error is returned.
pub fn reset_dir(path: &Path) -> io::Result<PathBuf> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
        tracing::debug!("removed {}", path.display());
    }
    match fs::create_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            tracing::warn!("{} already exists and is not a directory", path.display());
        }
        Err(e) => return Err(e),
    }
    Ok(path.to_path_buf())
}
