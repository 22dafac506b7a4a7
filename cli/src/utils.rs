use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use flate2::{write::GzEncoder, Compression};
use regex::Regex;
use serde_json::Value;

/// Sidecar keys removed by `update-json-files`.
pub const STRIPPED_SIDECAR_KEYS: [&str; 5] = ["views", "likes", "usageCount", "favoriteCount", "slug"];

/// Outcome of a batch over many files. Per-file failures are counted, not
/// propagated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Remove [`STRIPPED_SIDECAR_KEYS`] from a JSON object. Returns whether
/// anything was removed.
pub fn strip_sidecar_keys(value: &mut Value) -> bool {
    let Some(object) = value.as_object_mut() else {
        return false;
    };
    let mut removed = false;
    for key in STRIPPED_SIDECAR_KEYS {
        removed |= object.shift_remove(key).is_some();
    }
    removed
}

pub fn collect_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn update_json_file(path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut value: Value =
        serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))?;
    if !value.is_object() {
        anyhow::bail!("{} is not a JSON object", path.display());
    }
    strip_sidecar_keys(&mut value);
    let json = serde_json::to_string_pretty(&value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn update_json_files(dir: &Path) -> Result<BatchSummary> {
    let files = collect_json_files(dir)?;
    tracing::info!("Found {} JSON files in {}", files.len(), dir.display());

    let mut summary = BatchSummary::default();
    for path in files {
        match update_json_file(&path) {
            Ok(()) => {
                tracing::info!("Updated {}", path.display());
                summary.succeeded += 1;
            },
            Err(err) => {
                tracing::error!("Failed to update {}: {err:#}", path.display());
                summary.failed += 1;
            },
        }
    }
    Ok(summary)
}

/// Whitespace and comment stripping for exported HTML.
pub struct HtmlMinifier {
    comments: Regex,
    whitespace: Regex,
    between_tags: Regex,
}

// Conditional comments (`<!--[if IE]>`) and `<!--<!...` are kept.
const HTML_COMMENT_PATTERN: &str = r"<!--(?:[^\[><]|<[^!])[\s\S]*?-->";

impl HtmlMinifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            comments: Regex::new(HTML_COMMENT_PATTERN).context("invalid comment regex")?,
            whitespace: Regex::new(r"\s{2,}").context("invalid whitespace regex")?,
            between_tags: Regex::new(r">\s+<").context("invalid tag regex")?,
        })
    }

    pub fn minify(&self, html: &str) -> String {
        let html = self.comments.replace_all(html, "");
        let html = self.whitespace.replace_all(&html, " ");
        self.between_tags.replace_all(&html, "><").into_owned()
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn gzip_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Walk `dir`, minify `.html` files in place and write a `<file>.gz` next to
/// every `.html`, `.js` and `.css` file.
pub fn optimize_build(dir: &Path) -> Result<BatchSummary> {
    if !dir.is_dir() {
        anyhow::bail!("output directory {} does not exist; build the site first", dir.display());
    }
    let minifier = HtmlMinifier::new()?;

    let mut summary = BatchSummary::default();
    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = extension_of(path) else {
            continue;
        };
        if !matches!(ext.as_str(), "html" | "js" | "css") {
            continue;
        }

        match optimize_file(&minifier, path, &ext) {
            Ok(()) => {
                tracing::debug!("Optimized {}", path.display());
                summary.succeeded += 1;
            },
            Err(err) => {
                tracing::error!("Failed to optimize {}: {err:#}", path.display());
                summary.failed += 1;
            },
        }
    }
    Ok(summary)
}

fn optimize_file(minifier: &HtmlMinifier, path: &Path, ext: &str) -> Result<()> {
    let mut content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    if ext == "html" {
        content = minifier.minify(&content);
        fs::write(path, &content).with_context(|| format!("failed to write {}", path.display()))?;
    }

    let mut gz_name = path.as_os_str().to_owned();
    gz_name.push(".gz");
    let gz_path = PathBuf::from(gz_name);
    fs::write(&gz_path, gzip_bytes(content.as_bytes())?)
        .with_context(|| format!("failed to write {}", gz_path.display()))?;
    Ok(())
}
