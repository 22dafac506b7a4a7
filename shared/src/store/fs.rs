use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use super::{sort_by_created_desc, ContentStore};
use crate::{
    error::{StoreError, StoreResult},
    frontmatter::{parse_document, render_document},
    fsutil::{
        create_new_file, ensure_dir, generate_unique_slug, now_iso, parse_json_for_edit,
        parse_json_or_default, read_optional, remove_file_if_exists, slugify, write_file,
    },
    model::{ContentFields, MetadataFields, PromptDraft, PromptPatch, PromptRecord},
};

/// Prompt store backed by a directory of `<slug>.md` + `<slug>.json` pairs.
///
/// A missing directory reads as empty; it is created on the first write.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn markdown_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}.md"))
    }

    fn sidecar_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}.json"))
    }

    /// Read and merge one record. With `for_edit`, a malformed sidecar is an
    /// error instead of being replaced by defaults.
    async fn read_record(&self, slug: &str, for_edit: bool) -> StoreResult<Option<PromptRecord>> {
        let markdown_path = self.markdown_path(slug);
        let Some(raw) = read_optional(&markdown_path).await? else {
            tracing::debug!("Prompt file not found: {}", markdown_path.display());
            return Ok(None);
        };
        let document = parse_document(&raw, &markdown_path);

        let sidecar_path = self.sidecar_path(slug);
        let meta: MetadataFields = match read_optional(&sidecar_path).await? {
            Some(content) if for_edit => parse_json_for_edit(&content, &sidecar_path)?,
            Some(content) => parse_json_or_default(&content, &sidecar_path),
            None => MetadataFields::default(),
        };

        let file_time = if meta.created_at.is_none() && !document.legacy.has_created() {
            modified_time(&markdown_path).await
        } else {
            None
        };

        Ok(Some(PromptRecord::from_sources(
            slug.to_string(),
            document,
            meta,
            file_time,
            Utc::now(),
        )))
    }

    async fn write_markdown(&self, record: &PromptRecord) -> StoreResult<()> {
        let markdown = render_document(&record.front, &record.content);
        write_file(&self.markdown_path(&record.slug), &markdown).await
    }

    async fn write_sidecar(&self, record: &PromptRecord) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(&record.meta.to_sidecar_json())?;
        write_file(&self.sidecar_path(&record.slug), &json).await
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn list_slugs(&self) -> StoreResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::warn!("Prompts directory does not exist: {}", self.root.display());
                return Ok(Vec::new());
            },
            Err(err) => return Err(StoreError::io(&self.root, err)),
        };

        let mut slugs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| StoreError::io(&self.root, err))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|kind| kind.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if let Some(slug) = name.strip_suffix(".md") {
                slugs.push(slug.to_string());
            }
        }
        Ok(slugs)
    }

    async fn load(&self, slug: &str) -> StoreResult<Option<PromptRecord>> {
        let slug = clean_slug(slug);
        if !is_safe_slug(slug) {
            tracing::warn!("Rejected unsafe slug: {slug:?}");
            return Ok(None);
        }
        self.read_record(slug, false).await
    }

    async fn list_all(&self) -> StoreResult<Vec<PromptRecord>> {
        let slugs = self.list_slugs().await?;
        let mut records = Vec::with_capacity(slugs.len());
        for slug in &slugs {
            match self.read_record(slug, false).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {},
                Err(err) => tracing::warn!("Skipping prompt {slug}: {err}"),
            }
        }
        tracing::debug!("Loaded {} of {} prompts", records.len(), slugs.len());
        sort_by_created_desc(&mut records);
        Ok(records)
    }

    async fn create(&self, draft: PromptDraft) -> StoreResult<PromptRecord> {
        if draft.title.trim().is_empty() {
            return Err(StoreError::Invalid("title is required".to_string()));
        }
        if draft.content.trim().is_empty() {
            return Err(StoreError::Invalid("content is required".to_string()));
        }

        let slug = draft
            .custom_slug
            .as_deref()
            .map(slugify)
            .filter(|slug| !slug.is_empty())
            .unwrap_or_else(|| generate_unique_slug(&draft.title, Utc::now().timestamp_millis()));

        ensure_dir(&self.root).await?;
        let markdown_path = self.markdown_path(&slug);

        let created_at = draft.created_at.unwrap_or_else(now_iso);
        let mut record = PromptRecord {
            slug,
            front: ContentFields {
                title: draft.title,
                description: draft.description,
                category: draft.category,
                author: draft.author,
                tags: draft.tags,
            },
            content: draft.content,
            meta: MetadataFields {
                featured: draft.featured,
                rating: draft.rating,
                updated_at: Some(created_at.clone()),
                created_at: Some(created_at),
                ..MetadataFields::default()
            },
            is_new: false,
        };
        record.refresh_is_new(Utc::now());

        let markdown = render_document(&record.front, &record.content);
        if !create_new_file(&markdown_path, &markdown).await? {
            return Err(StoreError::Conflict(format!("prompt {} already exists", record.slug)));
        }
        if let Err(err) = self.write_sidecar(&record).await {
            if let Err(cleanup) = remove_file_if_exists(&markdown_path).await {
                tracing::error!("Failed to roll back {}: {cleanup}", markdown_path.display());
            }
            return Err(err);
        }

        tracing::info!("Created prompt {}", record.slug);
        Ok(record)
    }

    async fn update(&self, slug: &str, patch: PromptPatch) -> StoreResult<PromptRecord> {
        let slug = clean_slug(slug);
        let existing = if is_safe_slug(slug) {
            self.read_record(slug, true).await?
        } else {
            None
        };
        let Some(mut record) = existing else {
            return Err(StoreError::NotFound(format!("prompt {slug}")));
        };

        patch.apply(&mut record);
        record.meta.updated_at = Some(now_iso());
        record.refresh_is_new(Utc::now());

        self.write_markdown(&record).await?;
        self.write_sidecar(&record).await?;

        tracing::info!("Updated prompt {}", record.slug);
        Ok(record)
    }

    async fn delete(&self, slug: &str) -> StoreResult<bool> {
        let slug = clean_slug(slug);
        if !is_safe_slug(slug) {
            return Ok(false);
        }

        let markdown = remove_file_if_exists(&self.markdown_path(slug)).await;
        let sidecar = remove_file_if_exists(&self.sidecar_path(slug)).await;

        match (markdown, sidecar) {
            (Ok(md_removed), Ok(json_removed)) => {
                tracing::info!(
                    "Deleted prompt {slug}: markdown={md_removed}, sidecar={json_removed}"
                );
                Ok(md_removed || json_removed)
            },
            (Ok(removed), Err(err)) | (Err(err), Ok(removed)) => {
                tracing::warn!("Partially deleted prompt {slug}: {err}");
                Ok(removed)
            },
            (Err(err), Err(_)) => Err(err),
        }
    }
}

fn clean_slug(slug: &str) -> &str {
    slug.strip_suffix(".md").unwrap_or(slug)
}

/// Slugs address files directly, so they must stay inside the directory.
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\', '\0'])
}

async fn modified_time(path: &Path) -> Option<String> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    let modified = metadata.modified().ok()?;
    Some(DateTime::<Utc>::from(modified).to_rfc3339_opts(SecondsFormat::Millis, true))
}
