use std::path::Path;

use anyhow::{Context, Result};
use prompt_library_shared::audit::audit_directory;

pub async fn run(prompts_dir: &Path, json: bool) -> Result<()> {
    let report = audit_directory(prompts_dir)
        .await
        .with_context(|| format!("failed to audit {}", prompts_dir.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !report.exists {
        println!("{} does not exist", report.directory);
        return Ok(());
    }
    println!(
        "{}: {} markdown files, {} sidecars",
        report.directory, report.markdown_files, report.sidecar_files
    );
    for (label, slugs) in [
        ("orphaned sidecars", &report.orphaned_sidecars),
        ("missing sidecars", &report.missing_sidecars),
        ("malformed sidecars", &report.malformed_sidecars),
    ] {
        if !slugs.is_empty() {
            println!("{label} ({}): {}", slugs.len(), slugs.join(", "));
        }
    }
    if report.is_clean() {
        println!("no problems found");
    }
    Ok(())
}
