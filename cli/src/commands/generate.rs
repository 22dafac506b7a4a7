use anyhow::{Context, Result};
use prompt_library_shared::{
    publish::{self, PaginationReport, PublishOptions},
    ContentStore,
};

pub async fn index(store: &dyn ContentStore, options: &PublishOptions) -> Result<()> {
    let report = publish::generate_index(store, options)
        .await
        .context("failed to generate prompts index")?;
    tracing::info!(
        "Index generated: {} entries, {} files written to {}",
        report.entries,
        report.files_written,
        options.output_dir.display()
    );
    Ok(())
}

pub async fn paginated(store: &dyn ContentStore, options: &PublishOptions) -> Result<()> {
    let report = publish::generate_paginated_data(store, options)
        .await
        .context("failed to generate paginated data")?;
    log_pagination(&report);
    Ok(())
}

pub async fn build_data(store: &dyn ContentStore, options: &PublishOptions) -> Result<()> {
    let report = publish::generate_site_data(store, options)
        .await
        .context("failed to build site data")?;
    tracing::info!("Index generated: {} entries", report.index.entries);
    log_pagination(&report.pagination);
    tracing::info!(
        "Wrote {} files in total",
        report.index.files_written + report.pagination.files_written
    );
    Ok(())
}

fn log_pagination(report: &PaginationReport) {
    tracing::info!(
        "Paginated data generated: {} prompts, {} pages",
        report.total,
        report.total_pages
    );
    for category in &report.categories {
        tracing::info!(
            "  {} ({}): {} prompts, {} pages",
            category.category,
            category.dir_name,
            category.total,
            category.total_pages
        );
    }
}
