use std::path::Path;

use anyhow::Result;

use crate::utils;

pub fn run(prompts_dir: &Path) -> Result<()> {
    tracing::info!("Updating sidecar JSON files in {}", prompts_dir.display());
    let summary = utils::update_json_files(prompts_dir)?;
    tracing::info!("Update finished: {} succeeded, {} failed", summary.succeeded, summary.failed);
    Ok(())
}
