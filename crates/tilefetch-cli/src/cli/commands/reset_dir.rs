use anyhow::{Context, Result};
use std::path::Path;
use tilefetch_core::fsutil;

pub fn run_reset_dir(path: &Path) -> Result<()> {
    let path = fsutil::reset_dir(path).with_context(|| format!("reset {}", path.display()))?;
    tracing::info!("reset directory {}", path.display());
    Ok(())
}
