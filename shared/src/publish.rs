//! Build-time generation of the static JSON data consumed by the front-end.
//!
//! Layout under each target directory:
//!
//! ```text
//! prompts-index.json
//! paginated/all-prompts-meta.json
//! paginated/all-prompts-page-<n>.json
//! paginated/categories/<category>/meta.json
//! paginated/categories/<category>/page-<n>.json
//! ```
//!
//! Every artifact is written to the output directory and to each mirror
//! directory. The first failed write aborts the run.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    error::{StoreError, StoreResult},
    fsutil::{ensure_dir, write_file},
    model::{IndexEntry, PromptRecord},
    pagination::{group_by_category, paginate, CategoryGroup, DEFAULT_PER_PAGE},
    store::ContentStore,
};

/// Search index file name, relative to each target directory.
pub const INDEX_FILE: &str = "prompts-index.json";
/// Directory holding all page shards; cleared on every run.
pub const PAGINATED_DIR: &str = "paginated";

/// Where and how to write generated data.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Primary output directory.
    pub output_dir: PathBuf,
    /// Extra directories that receive an identical copy.
    pub mirror_dirs: Vec<PathBuf>,
    /// Page size; zero is treated as one.
    pub per_page: usize,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("public/data"),
            mirror_dirs: vec![PathBuf::from("out/PromptLibrary/data")],
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PublishOptions {
    fn targets(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.output_dir.as_path()).chain(self.mirror_dirs.iter().map(PathBuf::as_path))
    }
}

/// Outcome of [`write_index`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub entries: usize,
    pub files_written: usize,
}

/// Shards written for one category directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPages {
    pub category: String,
    pub dir_name: String,
    pub total: usize,
    pub total_pages: usize,
}

/// Outcome of [`write_paginated`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationReport {
    pub total: usize,
    pub total_pages: usize,
    pub categories: Vec<CategoryPages>,
    pub files_written: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteReport {
    pub index: IndexReport,
    pub pagination: PaginationReport,
}

/// Writes one relative path into every target directory.
struct ArtifactWriter<'a> {
    options: &'a PublishOptions,
    written: usize,
}

impl<'a> ArtifactWriter<'a> {
    fn new(options: &'a PublishOptions) -> Self {
        Self {
            options,
            written: 0,
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&mut self, relative: &Path, value: &T) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(value)?;
        for target in self.options.targets() {
            let path = target.join(relative);
            if let Some(parent) = path.parent() {
                ensure_dir(parent).await?;
            }
            write_file(&path, &json).await?;
            self.written += 1;
        }
        Ok(())
    }

    /// Drop `relative` in every target so stale shards do not survive.
    async fn clear_dir(&self, relative: &Path) -> StoreResult<()> {
        for target in self.options.targets() {
            let dir = target.join(relative);
            match tokio::fs::remove_dir_all(&dir).await {
                Ok(()) => tracing::debug!("Cleared {}", dir.display()),
                Err(err) if err.kind() == ErrorKind::NotFound => {},
                Err(err) => return Err(StoreError::io(&dir, err)),
            }
        }
        Ok(())
    }
}

/// Write `prompts-index.json` from the given records, in order.
pub async fn write_index(records: &[PromptRecord], options: &PublishOptions) -> StoreResult<IndexReport> {
    let entries = records.iter().map(IndexEntry::from).collect::<Vec<_>>();
    let mut writer = ArtifactWriter::new(options);
    writer.write_json(Path::new(INDEX_FILE), &entries).await?;

    tracing::info!("Wrote index with {} entries", entries.len());
    Ok(IndexReport {
        entries: entries.len(),
        files_written: writer.written,
    })
}

/// Write the paginated listing and per-category shards.
pub async fn write_paginated(
    records: &[PromptRecord],
    options: &PublishOptions,
) -> StoreResult<PaginationReport> {
    let mut writer = ArtifactWriter::new(options);
    let paginated_dir = Path::new(PAGINATED_DIR);
    writer.clear_dir(paginated_dir).await?;

    let all = paginate(records, options.per_page, None);
    writer
        .write_json(&paginated_dir.join("all-prompts-meta.json"), &all.meta)
        .await?;
    for (index, page) in all.pages.iter().enumerate() {
        let name = format!("all-prompts-page-{}.json", index + 1);
        writer.write_json(&paginated_dir.join(name), page).await?;
    }

    let mut categories = Vec::new();
    for CategoryGroup {
        category,
        dir_name,
        members,
    } in group_by_category(records)
    {
        let category_dir = paginated_dir.join("categories").join(&dir_name);
        let paginated = paginate(&members, options.per_page, Some(&category));

        writer
            .write_json(&category_dir.join("meta.json"), &paginated.meta)
            .await?;
        for (index, page) in paginated.pages.iter().enumerate() {
            let name = format!("page-{}.json", index + 1);
            writer.write_json(&category_dir.join(name), page).await?;
        }

        tracing::debug!(
            "Category {category}: {} prompts in {} pages",
            paginated.meta.total,
            paginated.meta.total_pages
        );
        categories.push(CategoryPages {
            category,
            dir_name,
            total: paginated.meta.total,
            total_pages: paginated.meta.total_pages,
        });
    }

    tracing::info!(
        "Wrote {} prompts in {} pages across {} categories",
        all.meta.total,
        all.meta.total_pages,
        categories.len()
    );
    Ok(PaginationReport {
        total: all.meta.total,
        total_pages: all.meta.total_pages,
        categories,
        files_written: writer.written,
    })
}

/// Load every record from `store` and write the index.
pub async fn generate_index(store: &dyn ContentStore, options: &PublishOptions) -> StoreResult<IndexReport> {
    let records = store.list_all().await?;
    write_index(&records, options).await
}

/// Load every record from `store` and write the page shards.
pub async fn generate_paginated_data(
    store: &dyn ContentStore,
    options: &PublishOptions,
) -> StoreResult<PaginationReport> {
    let records = store.list_all().await?;
    write_paginated(&records, options).await
}

/// Index and pagination from a single load of the store.
pub async fn generate_site_data(store: &dyn ContentStore, options: &PublishOptions) -> StoreResult<SiteReport> {
    let records = store.list_all().await?;
    let index = write_index(&records, options).await?;
    let pagination = write_paginated(&records, options).await?;
    Ok(SiteReport {
        index,
        pagination,
    })
}
