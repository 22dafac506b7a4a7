pub mod audit;
pub mod generate;
pub mod optimize_build;
pub mod prompts;
pub mod search;
pub mod seed;
pub mod stats;
pub mod update_json_files;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use prompt_library_shared::{ContentStore, FsContentStore, HttpContentStore};

use crate::cli::{Cli, Commands};

/// Filesystem store by default, HTTP store when `--api-base` is given.
pub fn open_store(prompts_dir: &Path, api_base: Option<&str>) -> Result<Arc<dyn ContentStore>> {
    match api_base {
        Some(base) => {
            let store = HttpContentStore::new(base)
                .with_context(|| format!("invalid --api-base {base}"))?;
            tracing::info!("Using admin API at {}", store.base_url());
            Ok(Arc::new(store))
        },
        None => Ok(Arc::new(FsContentStore::new(prompts_dir))),
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let Cli {
        prompts_dir,
        api_base,
        command,
    } = cli;
    let store = || open_store(&prompts_dir, api_base.as_deref());

    match command {
        Commands::GenerateIndex {
            output,
        } => generate::index(store()?.as_ref(), &output.publish_options()).await,
        Commands::GeneratePaginatedData {
            output,
        } => generate::paginated(store()?.as_ref(), &output.publish_options()).await,
        Commands::BuildData {
            output,
        } => generate::build_data(store()?.as_ref(), &output.publish_options()).await,
        Commands::OptimizeBuild {
            dir,
        } => optimize_build::run(&dir),
        Commands::UpdateJsonFiles => update_json_files::run(&prompts_dir),
        Commands::Seed => seed::run(store()?.as_ref()).await,
        Commands::Audit {
            json,
        } => audit::run(&prompts_dir, json).await,
        Commands::Stats {
            json,
        } => stats::run(store()?.as_ref(), json).await,
        Commands::Search {
            query,
            index,
        } => search::run(&index, &query),
        Commands::List {
            category,
            featured,
            limit,
        } => prompts::list(store()?.as_ref(), category.as_deref(), featured, limit).await,
        Commands::Show {
            slug,
            json,
        } => prompts::show(store()?.as_ref(), &slug, json).await,
        Commands::Delete {
            slug,
        } => prompts::delete(store()?.as_ref(), &slug).await,
    }
}
