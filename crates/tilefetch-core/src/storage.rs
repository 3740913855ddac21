//! Target file lifecycle.
//!
//! Streamed bodies are written to `<target>.part` and renamed over the target
//! only once the transfer succeeded. A writer dropped without `finalize`
//! removes its temp file, so a failed transfer never leaves a target behind.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `file.tgz` → `file.tgz.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Sequential writer for one target file.
pub struct StorageWriter {
    file: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
    written: u64,
}

impl StorageWriter {
    /// Create (or truncate) the temp file for `final_path`.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        Ok(StorageWriter {
            file: Some(BufWriter::new(file)),
            temp_path,
            final_path: final_path.to_path_buf(),
            written: 0,
        })
    }

    /// Append `data` to the temp file.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "storage writer already closed"))?;
        file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, sync and rename the temp file over the target. Returns the byte count.
    pub fn finalize(mut self) -> io::Result<u64> {
        if let Some(file) = self.file.take() {
            let file = file.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        std::fs::rename(&self.temp_path, &self.final_path)?;
        // Renamed; nothing left for Drop to clean up.
        self.temp_path.clear();
        Ok(self.written)
    }
}

impl Drop for StorageWriter {
    fn drop(&mut self) {
        if self.temp_path.as_os_str().is_empty() {
            return;
        }
        self.file.take();
        if let Err(e) = std::fs::remove_file(&self.temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("failed to remove {}: {}", self.temp_path.display(), e);
            }
        }
    }
}
