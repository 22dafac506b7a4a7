//! The prompt record loader.
//!
//! [`ContentStore`] is the capability the rest of the workspace programs
//! against. [`FsContentStore`] reads the prompts directory directly;
//! [`HttpContentStore`] talks to the admin API. Callers pick one when they
//! wire things up.

mod fs;
mod http;

use std::cmp::Ordering;

use async_trait::async_trait;

pub use self::{fs::FsContentStore, http::HttpContentStore};
use crate::{
    error::StoreResult,
    model::{PromptDraft, PromptPatch, PromptRecord},
};

/// Read and write access to prompt records, addressed by slug.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Slugs of every `.md` file, in directory enumeration order.
    async fn list_slugs(&self) -> StoreResult<Vec<String>>;

    /// Load one record. `Ok(None)` when the markdown file does not exist.
    async fn load(&self, slug: &str) -> StoreResult<Option<PromptRecord>>;

    /// Every record, newest first (see [`sort_by_created_desc`]).
    async fn list_all(&self) -> StoreResult<Vec<PromptRecord>>;

    /// Persist a new record. `title` and `content` are required; a taken
    /// slug is [`crate::StoreError::Conflict`].
    async fn create(&self, draft: PromptDraft) -> StoreResult<PromptRecord>;

    /// Apply `patch` and bump `updatedAt`. Missing records are
    /// [`crate::StoreError::NotFound`].
    async fn update(&self, slug: &str, patch: PromptPatch) -> StoreResult<PromptRecord>;

    /// Remove both files of `slug`. `Ok(false)` when neither existed.
    async fn delete(&self, slug: &str) -> StoreResult<bool>;

    /// Featured records by rating, highest first, at most `limit`.
    async fn featured(&self, limit: usize) -> StoreResult<Vec<PromptRecord>> {
        Ok(rank_featured(self.list_all().await?, limit))
    }

    /// The `limit` most recently created records.
    async fn recent(&self, limit: usize) -> StoreResult<Vec<PromptRecord>> {
        let mut records = self.list_all().await?;
        sort_by_created_desc(&mut records);
        records.truncate(limit);
        Ok(records)
    }

    /// Records whose category equals `category` exactly, newest first.
    async fn by_category(&self, category: &str) -> StoreResult<Vec<PromptRecord>> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|record| record.front.category == category)
            .collect())
    }
}

/// Stable sort by `createdAt`, newest first. Records whose date is missing or
/// unparsable go last and keep their relative order.
pub fn sort_by_created_desc(records: &mut [PromptRecord]) {
    records.sort_by(|a, b| b.created_timestamp().cmp(&a.created_timestamp()));
}

/// Keep featured records, order them by rating (missing = 0) highest first
/// with ties in input order, and take `limit`.
pub fn rank_featured(records: Vec<PromptRecord>, limit: usize) -> Vec<PromptRecord> {
    let mut featured = records
        .into_iter()
        .filter(|record| record.meta.featured)
        .collect::<Vec<_>>();
    featured.sort_by(|a, b| {
        b.rating_or_zero()
            .partial_cmp(&a.rating_or_zero())
            .unwrap_or(Ordering::Equal)
    });
    featured.truncate(limit);
    featured
}
