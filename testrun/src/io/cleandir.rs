//! Results directory preparation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Recursively clear `dir` and recreate it empty.
///
/// Idempotent: a missing directory is simply created.
pub fn clean_results_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .with_context(|| format!("clear results directory {}", dir.display()))?;
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("create results directory {}", dir.display()))?;
    debug!(dir = %dir.display(), "results directory ready");
    Ok(())
}
