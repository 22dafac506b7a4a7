use std::path::Path;

use anyhow::Result;

use crate::utils;

pub fn run(dir: &Path) -> Result<()> {
    tracing::info!("Optimizing build output in {}", dir.display());
    let summary = utils::optimize_build(dir)?;
    tracing::info!(
        "Optimization finished: {} files processed, {} failed",
        summary.succeeded,
        summary.failed
    );
    Ok(())
}
