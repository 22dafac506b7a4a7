use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use prompt_library_shared::{pagination::DEFAULT_PER_PAGE, publish::PublishOptions};

#[derive(Parser)]
#[command(name = "pl-cli", version, about = "Prompt library build and maintenance CLI")]
pub struct Cli {
    /// Directory holding `<slug>.md` / `<slug>.json` pairs.
    #[arg(long, global = true, default_value = "prompts")]
    pub prompts_dir: PathBuf,
    /// Read and write through a running admin API instead of the filesystem,
    /// e.g. `http://localhost:3000`.
    #[arg(long, global = true)]
    pub api_base: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

/// Where generated data goes.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Primary output directory.
    #[arg(long, default_value = "public/data")]
    pub output_dir: PathBuf,
    /// Directory that receives a copy of every artifact. Repeatable.
    #[arg(long = "mirror-dir", default_value = "out/PromptLibrary/data")]
    pub mirror_dirs: Vec<PathBuf>,
    /// Skip the mirror directories.
    #[arg(long)]
    pub no_mirror: bool,
    /// Prompts per page.
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: usize,
}

impl OutputArgs {
    pub fn publish_options(&self) -> PublishOptions {
        PublishOptions {
            output_dir: self.output_dir.clone(),
            mirror_dirs: if self.no_mirror {
                Vec::new()
            } else {
                self.mirror_dirs.clone()
            },
            per_page: self.per_page.max(1),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write `prompts-index.json`.
    GenerateIndex {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Write the paginated listing and per-category shards.
    GeneratePaginatedData {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Index and paginated data in one pass.
    BuildData {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Minify exported HTML and write `.gz` siblings for html/js/css.
    OptimizeBuild {
        /// Static export directory.
        #[arg(long, default_value = "out")]
        dir: PathBuf,
    },
    /// Strip engagement counters and stray `slug` keys from every sidecar.
    UpdateJsonFiles,
    /// Create sample prompts when the library is empty.
    Seed,
    /// Report sidecars without markdown, markdown without sidecars and
    /// unparsable sidecars.
    Audit {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Totals, featured/new counts and the busiest categories and tags.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Substring search over a generated index.
    Search {
        query: String,
        #[arg(long, default_value = "public/data/prompts-index.json")]
        index: PathBuf,
    },
    /// List prompts, newest first.
    List {
        /// Exact category name.
        #[arg(long)]
        category: Option<String>,
        /// Featured prompts only, by rating.
        #[arg(long)]
        featured: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print one prompt.
    Show {
        slug: String,
        #[arg(long)]
        json: bool,
    },
    /// Delete a prompt's markdown and sidecar.
    Delete { slug: String },
}
