//! Translation bundle cache.
//!
//! Bundles are JSON objects keyed by `(locale, namespace)` and fetched
//! through a [`TranslationLoader`]. The cache is an ordinary value: create it
//! once at startup and share it behind an `Arc`.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::{
    error::{StoreError, StoreResult},
    fsutil::read_optional,
    model::CategoryRecord,
};

/// Namespace holding category names.
pub const DEFAULT_NAMESPACE: &str = "common";
/// Locale active before any switch.
pub const DEFAULT_LOCALE: &str = "zh";

/// Source of `<locale>/<namespace>` translation bundles.
#[async_trait]
pub trait TranslationLoader: Send + Sync {
    async fn load(&self, locale: &str, namespace: &str) -> StoreResult<Value>;
}

/// Reads `<dir>/<locale>/<namespace>.json`.
#[derive(Debug, Clone)]
pub struct FsTranslationLoader {
    dir: PathBuf,
}

impl FsTranslationLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
        }
    }
}

#[async_trait]
impl TranslationLoader for FsTranslationLoader {
    async fn load(&self, locale: &str, namespace: &str) -> StoreResult<Value> {
        if !is_plain_segment(locale) || !is_plain_segment(namespace) {
            return Err(StoreError::Invalid(format!("bad translation key {locale}/{namespace}")));
        }
        let path = self.dir.join(locale).join(format!("{namespace}.json"));
        let Some(raw) = read_optional(&path).await? else {
            return Err(StoreError::NotFound(path.display().to_string()));
        };
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Fetches `<base>/locales/<locale>/<namespace>.json`.
#[derive(Debug, Clone)]
pub struct HttpTranslationLoader {
    base: Url,
    client: reqwest::Client,
}

impl HttpTranslationLoader {
    pub fn new(base_url: &str) -> StoreResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|err| StoreError::Invalid(format!("invalid locales base {base_url}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::Invalid(format!("invalid locales base {base_url}")));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base,
            client,
        })
    }
}

#[async_trait]
impl TranslationLoader for HttpTranslationLoader {
    async fn load(&self, locale: &str, namespace: &str) -> StoreResult<Value> {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push("locales")
                .push(locale)
                .push(&format!("{namespace}.json"));
        }

        let response = self.client.get(url.clone()).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(url.to_string())),
            status if status.is_success() => Ok(response.json().await?),
            status => Err(StoreError::Http(format!("{status} fetching {url}"))),
        }
    }
}

type BundleCell = Arc<OnceCell<Arc<Value>>>;

/// Per-process cache of translation bundles.
///
/// Concurrent requests for the same key share one load. Failed or empty
/// loads are not cached, so the next request tries again.
pub struct TranslationCache {
    loader: Arc<dyn TranslationLoader>,
    bundles: Mutex<HashMap<(String, String), BundleCell>>,
    active_locale: Mutex<String>,
}

impl std::fmt::Debug for TranslationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationCache")
            .field("active_locale", &self.active_locale())
            .finish_non_exhaustive()
    }
}

impl TranslationCache {
    pub fn new(loader: Arc<dyn TranslationLoader>) -> Self {
        Self {
            loader,
            bundles: Mutex::new(HashMap::new()),
            active_locale: Mutex::new(DEFAULT_LOCALE.to_string()),
        }
    }

    fn cell(&self, locale: &str, namespace: &str) -> BundleCell {
        let mut bundles = self.bundles.lock().unwrap_or_else(PoisonError::into_inner);
        bundles
            .entry((locale.to_string(), namespace.to_string()))
            .or_default()
            .clone()
    }

    /// Drop the key when its load failed, so unknown locales do not pile up.
    fn forget_failed(&self, locale: &str, namespace: &str, cell: &BundleCell) {
        let mut bundles = self.bundles.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (locale.to_string(), namespace.to_string());
        let stale = bundles
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, cell) && !current.initialized());
        if stale {
            bundles.remove(&key);
        }
    }

    /// Cached bundle for the key, loading it on first use.
    pub async fn get(&self, locale: &str, namespace: &str) -> StoreResult<Arc<Value>> {
        let cell = self.cell(locale, namespace);
        let loaded = cell
            .get_or_try_init(|| async {
                let value = self.loader.load(locale, namespace).await.map_err(|err| {
                    tracing::warn!("Failed to load translations {locale}/{namespace}: {err}");
                    err
                })?;
                if is_empty_bundle(&value) {
                    tracing::warn!("Translation bundle {locale}/{namespace} is empty");
                    return Err(StoreError::Invalid(format!("empty bundle {locale}/{namespace}")));
                }
                tracing::debug!("Loaded translations {locale}/{namespace}");
                Ok::<_, StoreError>(Arc::new(value))
            })
            .await;
        match loaded {
            Ok(bundle) => Ok(bundle.clone()),
            Err(err) => {
                self.forget_failed(locale, namespace, &cell);
                Err(err)
            },
        }
    }

    /// Number of `(locale, namespace)` keys currently held.
    pub fn cached_bundles(&self) -> usize {
        self.bundles.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Drop any cached bundle for the key and load it again.
    pub async fn reload(&self, locale: &str, namespace: &str) -> StoreResult<Arc<Value>> {
        self.bundles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(locale.to_string(), namespace.to_string()));
        self.get(locale, namespace).await
    }

    /// Translate a dotted key, `None` when the bundle or key is missing.
    pub async fn translate(&self, locale: &str, namespace: &str, key: &str) -> Option<String> {
        let bundle = self.get(locale, namespace).await.ok()?;
        lookup(&bundle, key).map(str::to_string)
    }

    pub fn clear(&self) {
        self.bundles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn active_locale(&self) -> String {
        self.active_locale
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change the active locale. Cached bundles are dropped when it differs.
    pub fn switch_locale(&self, locale: &str) {
        let mut active = self.active_locale.lock().unwrap_or_else(PoisonError::into_inner);
        if *active != locale {
            tracing::info!("Switching locale {} -> {locale}", *active);
            *active = locale.to_string();
            drop(active);
            self.clear();
        }
    }

    /// Fill `display_name` from each category's `name_key`, falling back to
    /// its `name`.
    pub async fn localize_categories(&self, locale: &str, categories: &mut [CategoryRecord]) {
        let bundle = self.get(locale, DEFAULT_NAMESPACE).await.ok();
        for category in categories {
            let translated = bundle.as_deref().and_then(|bundle| {
                category
                    .name_key
                    .as_deref()
                    .and_then(|key| lookup(bundle, key))
            });
            category.display_name = Some(translated.unwrap_or(&category.name).to_string());
        }
    }
}

/// Resolve `a.b.c` inside nested JSON objects to a string.
pub fn lookup<'a>(bundle: &'a Value, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(bundle, |node, part| node.get(part))
        .and_then(Value::as_str)
}

fn is_empty_bundle(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Null => true,
        _ => false,
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.starts_with('.') && !segment.contains(['/', '\\'])
}
