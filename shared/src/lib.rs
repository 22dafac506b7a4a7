//! Core of the prompt library: the on-disk record format, the
//! [`ContentStore`] capability with filesystem and HTTP backends, category
//! aggregation, and the static data generator used at build time.
//!
//! A prompt lives in two files under the prompts directory:
//! `<slug>.md` (YAML front matter + markdown body) and `<slug>.json`
//! (featured flag, rating, dates, engagement counters).

pub mod api;
pub mod audit;
pub mod categories;
pub mod error;
pub mod frontmatter;
pub mod fsutil;
pub mod i18n;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod publish;
pub mod search;
pub mod stats;
pub mod store;

pub use categories::CategoryCatalog;
pub use error::{StoreError, StoreResult};
pub use model::{
    CategoryDefinition, CategoryPatch, CategoryRecord, ContentFields, IndexEntry, MetadataFields,
    PaginationMeta, PromptDraft, PromptPatch, PromptRecord,
};
pub use store::{ContentStore, FsContentStore, HttpContentStore};
