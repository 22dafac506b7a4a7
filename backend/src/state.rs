use std::{path::PathBuf, sync::Arc};

use prompt_library_shared::{
    i18n::{FsTranslationLoader, TranslationCache},
    CategoryCatalog, ContentStore, FsContentStore,
};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub categories: Arc<CategoryCatalog>,
    pub translations: Arc<TranslationCache>,
    /// Scanned by the consistency audit.
    pub prompts_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let loader = Arc::new(FsTranslationLoader::new(&config.locales_dir));
        Self {
            store: Arc::new(FsContentStore::new(&config.prompts_dir)),
            categories: Arc::new(CategoryCatalog::new(&config.categories_file)),
            translations: Arc::new(TranslationCache::new(loader)),
            prompts_dir: config.prompts_dir.clone(),
        }
    }
}
