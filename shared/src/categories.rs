//! Category definitions and live prompt counts.
//!
//! Definitions live in a JSON file (an array of `{slug, name, nameKey?,
//! icon}`). When the file is missing or empty the built-in list is used.
//! Counts are computed from the store on every read and never persisted.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::{
    error::{StoreError, StoreResult},
    fsutil::{ensure_dir, parse_json_for_edit, parse_json_or_default, read_optional, write_file},
    model::{CategoryDefinition, CategoryPatch, CategoryRecord, PromptRecord},
    store::ContentStore,
};

const BUILTIN_CATEGORIES: [(&str, &str, &str, &str); 7] = [
    ("content-creation", "内容创作", "categories.content_creation", "fa-pen-fancy"),
    ("programming", "编程开发", "categories.programming", "fa-code"),
    ("creative-design", "创意设计", "categories.creative_design", "fa-palette"),
    ("data-analysis", "数据分析", "categories.data_analysis", "fa-chart-line"),
    ("marketing", "营销推广", "categories.marketing", "fa-bullhorn"),
    ("education", "教育学习", "categories.education", "fa-graduation-cap"),
    ("other", "其他", "categories.other", "fa-ellipsis"),
];

/// The built-in category list.
pub fn default_categories() -> Vec<CategoryDefinition> {
    BUILTIN_CATEGORIES
        .iter()
        .map(|(slug, name, name_key, icon)| CategoryDefinition {
            slug: (*slug).to_string(),
            name: (*name).to_string(),
            name_key: Some((*name_key).to_string()),
            icon: (*icon).to_string(),
        })
        .collect()
}

/// Attach counts to `definitions`.
///
/// Each record with a non-empty category is counted once: against the first
/// definition whose `name` equals it, otherwise the first whose `slug`
/// equals it (older files store the slug). Unmatched records are ignored.
pub fn count_prompts(
    definitions: Vec<CategoryDefinition>,
    records: &[PromptRecord],
) -> Vec<CategoryRecord> {
    let mut counts = vec![0usize; definitions.len()];
    for record in records {
        let category = record.front.category.as_str();
        if category.is_empty() {
            continue;
        }
        let matched = definitions
            .iter()
            .position(|def| def.name == category)
            .or_else(|| definitions.iter().position(|def| def.slug == category));
        if let Some(index) = matched {
            counts[index] += 1;
        }
    }

    definitions
        .into_iter()
        .zip(counts)
        .map(|(def, count)| CategoryRecord::from_definition(def, count))
        .collect()
}

fn validate(definition: &CategoryDefinition) -> StoreResult<()> {
    let missing = [
        ("slug", &definition.slug),
        ("name", &definition.name),
        ("icon", &definition.icon),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect::<Vec<_>>();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Invalid(format!("missing required fields: {}", missing.join(", "))))
    }
}

/// Category configuration file plus the lock that serialises edits to it.
#[derive(Debug)]
pub struct CategoryCatalog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CategoryCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persisted definitions, or the built-in list when nothing usable is
    /// stored.
    pub async fn definitions(&self) -> StoreResult<Vec<CategoryDefinition>> {
        let stored: Vec<CategoryDefinition> = match read_optional(&self.path).await? {
            Some(content) => parse_json_or_default(&content, &self.path),
            None => Vec::new(),
        };
        Ok(self.or_builtin(stored))
    }

    /// Like [`Self::definitions`], but a malformed file is an error so an
    /// edit never replaces it with the built-in list.
    async fn definitions_for_edit(&self) -> StoreResult<Vec<CategoryDefinition>> {
        let stored: Vec<CategoryDefinition> = match read_optional(&self.path).await? {
            Some(content) => parse_json_for_edit(&content, &self.path)?,
            None => Vec::new(),
        };
        Ok(self.or_builtin(stored))
    }

    fn or_builtin(&self, stored: Vec<CategoryDefinition>) -> Vec<CategoryDefinition> {
        if stored.is_empty() {
            tracing::debug!("Using built-in categories ({} not usable)", self.path.display());
            return default_categories();
        }
        stored
    }

    /// All categories with counts. A failing store yields zero counts.
    pub async fn list(&self, store: &dyn ContentStore) -> StoreResult<Vec<CategoryRecord>> {
        let definitions = self.definitions().await?;
        let records = match store.list_all().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("Failed to load prompts for category counts: {err}");
                Vec::new()
            },
        };
        Ok(count_prompts(definitions, &records))
    }

    pub async fn get(
        &self,
        store: &dyn ContentStore,
        slug: &str,
    ) -> StoreResult<Option<CategoryRecord>> {
        Ok(self
            .list(store)
            .await?
            .into_iter()
            .find(|category| category.slug == slug))
    }

    /// Append a definition. Duplicate slugs are a conflict.
    pub async fn add(&self, definition: CategoryDefinition) -> StoreResult<CategoryDefinition> {
        validate(&definition)?;
        let _guard = self.write_lock.lock().await;

        let mut definitions = self.definitions_for_edit().await?;
        if definitions.iter().any(|def| def.slug == definition.slug) {
            return Err(StoreError::Conflict(format!("category {}", definition.slug)));
        }
        definitions.push(definition.clone());
        self.save(&definitions).await?;

        tracing::info!("Added category {}", definition.slug);
        Ok(definition)
    }

    /// Apply the fields set in `patch` to the category `slug`.
    pub async fn update(
        &self,
        slug: &str,
        patch: CategoryPatch,
    ) -> StoreResult<CategoryDefinition> {
        let _guard = self.write_lock.lock().await;

        let mut definitions = self.definitions_for_edit().await?;
        let Some(definition) = definitions.iter_mut().find(|def| def.slug == slug) else {
            return Err(StoreError::NotFound(format!("category {slug}")));
        };
        if let Some(name) = patch.name {
            definition.name = name;
        }
        if patch.name_key.is_some() {
            definition.name_key = patch.name_key;
        }
        if let Some(icon) = patch.icon {
            definition.icon = icon;
        }
        validate(definition)?;
        let updated = definition.clone();
        self.save(&definitions).await?;

        tracing::info!("Updated category {slug}");
        Ok(updated)
    }

    /// Remove a category. Prompts that reference it are left untouched.
    pub async fn delete(&self, slug: &str) -> StoreResult<CategoryDefinition> {
        let _guard = self.write_lock.lock().await;

        let mut definitions = self.definitions_for_edit().await?;
        let Some(index) = definitions.iter().position(|def| def.slug == slug) else {
            return Err(StoreError::NotFound(format!("category {slug}")));
        };
        let removed = definitions.remove(index);
        self.save(&definitions).await?;

        tracing::info!("Deleted category {slug}");
        Ok(removed)
    }

    /// Replace the whole list. Every entry must be complete and slugs unique.
    pub async fn replace_all(&self, definitions: Vec<CategoryDefinition>) -> StoreResult<()> {
        for (index, definition) in definitions.iter().enumerate() {
            validate(definition)?;
            if definitions[..index]
                .iter()
                .any(|earlier| earlier.slug == definition.slug)
            {
                return Err(StoreError::Invalid(format!("duplicate category slug {}", definition.slug)));
            }
        }

        let _guard = self.write_lock.lock().await;
        self.save(&definitions).await?;
        tracing::info!("Replaced category list ({} entries)", definitions.len());
        Ok(())
    }

    async fn save(&self, definitions: &[CategoryDefinition]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            ensure_dir(parent).await?;
        }
        let json = serde_json::to_string_pretty(definitions)?;
        write_file(&self.path, &json).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        model::{ContentFields, MetadataFields},
        store::FsContentStore,
    };

    fn record(category: &str) -> PromptRecord {
        PromptRecord {
            slug: format!("p-{category}"),
            front: ContentFields {
                category: category.to_string(),
                ..ContentFields::default()
            },
            content: String::new(),
            meta: MetadataFields::default(),
            is_new: false,
        }
    }

    fn definition(slug: &str, name: &str) -> CategoryDefinition {
        CategoryDefinition {
            slug: slug.to_string(),
            name: name.to_string(),
            name_key: None,
            icon: "fa-star".to_string(),
        }
    }

    #[test]
    fn counts_match_name_then_legacy_slug() {
        let records = vec![
            record("编程开发"),
            record("programming"),
            record("营销推广"),
            record("其他"),
            record("unknown"),
            record(""),
        ];
        let categories = count_prompts(default_categories(), &records);
        let count = |slug: &str| {
            categories
                .iter()
                .find(|category| category.slug == slug)
                .map(|category| category.count)
        };
        assert_eq!(count("programming"), Some(2));
        assert_eq!(count("marketing"), Some(1));
        assert_eq!(count("other"), Some(1));
        assert_eq!(count("education"), Some(0));
        assert_eq!(categories.iter().map(|c| c.count).sum::<usize>(), 4);
    }

    #[test]
    fn name_match_takes_priority_over_slug_match() {
        let definitions = vec![definition("alpha", "beta"), definition("beta", "Beta Name")];
        let categories = count_prompts(definitions, &[record("beta")]);
        assert_eq!(categories[0].count, 1);
        assert_eq!(categories[1].count, 0);
    }

    #[tokio::test]
    async fn missing_or_empty_file_uses_builtin_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = CategoryCatalog::new(dir.path().join("categories.json"));
        assert_eq!(catalog.definitions().await.expect("defs"), default_categories());

        std::fs::write(catalog.path(), "[]").expect("write");
        assert_eq!(catalog.definitions().await.expect("defs").len(), 7);
    }

    #[tokio::test]
    async fn list_counts_prompts_from_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let prompts = dir.path().join("prompts");
        std::fs::create_dir(&prompts).expect("mkdir");
        std::fs::write(prompts.join("a.md"), "---\ncategory: \"编程开发\"\n---\n\nx").expect("write");
        std::fs::write(prompts.join("b.md"), "---\ncategory: programming\n---\n\nx").expect("write");

        let store = FsContentStore::new(&prompts);
        let catalog = CategoryCatalog::new(dir.path().join("config/categories.json"));
        let programming = catalog
            .get(&store, "programming")
            .await
            .expect("get")
            .expect("exists");
        assert_eq!(programming.count, 2);
        assert_eq!(catalog.get(&store, "nope").await.expect("get"), None);
    }

    #[tokio::test]
    async fn add_update_delete_persist_without_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = CategoryCatalog::new(dir.path().join("config/categories.json"));

        catalog.add(definition("travel", "旅行")).await.expect("add");
        let err = catalog.add(definition("travel", "again")).await.expect_err("dup");
        assert!(matches!(err, StoreError::Conflict(_)));

        let err = catalog
            .add(CategoryDefinition {
                icon: String::new(),
                ..definition("x", "X")
            })
            .await
            .expect_err("icon required");
        assert!(matches!(err, StoreError::Invalid(_)));

        let updated = catalog
            .update(
                "travel",
                CategoryPatch {
                    icon: Some("fa-plane".to_string()),
                    ..CategoryPatch::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.name, "旅行");
        assert_eq!(updated.icon, "fa-plane");

        let raw = std::fs::read_to_string(catalog.path()).expect("read");
        assert!(!raw.contains("count"));
        assert_eq!(catalog.definitions().await.expect("defs").len(), 8);

        catalog.delete("travel").await.expect("delete");
        let err = catalog.delete("travel").await.expect_err("gone");
        assert!(matches!(err, StoreError::NotFound(_)));
        let err = catalog
            .update("travel", CategoryPatch::default())
            .await
            .expect_err("gone");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn edits_keep_a_malformed_file_intact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = CategoryCatalog::new(dir.path().join("categories.json"));
        let hand_edited = r#"[{"slug":"mine","name":"Mine","icon":"fa-star"},]"#;
        std::fs::write(catalog.path(), hand_edited).expect("write");

        assert_eq!(catalog.definitions().await.expect("defs").len(), 7);

        let err = catalog.add(definition("travel", "旅行")).await.expect_err("malformed");
        assert!(matches!(err, StoreError::Malformed { .. }));
        let err = catalog
            .update("other", CategoryPatch::default())
            .await
            .expect_err("malformed");
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert!(catalog.delete("other").await.is_err());

        assert_eq!(std::fs::read_to_string(catalog.path()).expect("read"), hand_edited);
    }

    #[tokio::test]
    async fn replace_all_validates_every_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = CategoryCatalog::new(dir.path().join("categories.json"));

        let err = catalog
            .replace_all(vec![definition("a", "A"), definition("a", "B")])
            .await
            .expect_err("duplicate");
        assert!(matches!(err, StoreError::Invalid(_)));
        assert!(!catalog.path().exists());

        catalog
            .replace_all(vec![definition("a", "A"), definition("b", "B")])
            .await
            .expect("replace");
        let slugs = catalog
            .definitions()
            .await
            .expect("defs")
            .into_iter()
            .map(|def| def.slug)
            .collect::<Vec<_>>();
        assert_eq!(slugs, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn concurrent_adds_are_all_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = Arc::new(CategoryCatalog::new(dir.path().join("categories.json")));

        let handles = (0..8)
            .map(|i| {
                let catalog = catalog.clone();
                tokio::spawn(async move { catalog.add(definition(&format!("c{i}"), "C")).await })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.await.expect("join").expect("add");
        }

        assert_eq!(catalog.definitions().await.expect("defs").len(), 7 + 8);
    }
}
