//! Small filesystem and naming helpers shared by the stores and generators.

use std::{io::ErrorKind, path::Path};

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;

use crate::error::{StoreError, StoreResult};

/// Base used when a title slugifies to nothing (e.g. an all-CJK title).
const FALLBACK_SLUG_BASE: &str = "prompt";

/// Create `dir` (and parents) if it does not exist yet.
pub async fn ensure_dir(dir: &Path) -> StoreResult<()> {
    if tokio::fs::try_exists(dir)
        .await
        .map_err(|err| StoreError::io(dir, err))?
    {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|err| StoreError::io(dir, err))?;
    tracing::info!("Created directory {}", dir.display());
    Ok(())
}

/// Read a UTF-8 file, mapping "does not exist" to `None`.
pub async fn read_optional(path: &Path) -> StoreResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StoreError::io(path, err)),
    }
}

/// Write `content` to `path`, replacing any previous file.
pub async fn write_file(path: &Path, content: &str) -> StoreResult<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|err| StoreError::io(path, err))
}

/// Create `path` and write `content` only if it does not exist yet.
/// Returns `Ok(false)` when the file was already there.
pub async fn create_new_file(path: &Path, content: &str) -> StoreResult<bool> {
    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(StoreError::io(path, err)),
    };
    file.write_all(content.as_bytes())
        .await
        .map_err(|err| StoreError::io(path, err))?;
    file.flush().await.map_err(|err| StoreError::io(path, err))?;
    Ok(true)
}

/// Remove `path`. Returns `Ok(true)` when a file was removed and `Ok(false)`
/// when there was nothing to remove.
pub async fn remove_file_if_exists(path: &Path) -> StoreResult<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(StoreError::io(path, err)),
    }
}

/// Parse JSON, falling back to `T::default()` and logging when the content is
/// malformed. Blank content yields the default silently.
pub fn parse_json_or_default<T>(content: &str, origin: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if content.trim().is_empty() {
        return T::default();
    }
    match serde_json::from_str(content) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("Failed to parse {} (using defaults): {err}", origin.display());
            T::default()
        },
    }
}

/// Parse JSON that is about to be modified and written back. Blank content
/// yields the default; malformed content is an error so the file is kept.
pub fn parse_json_for_edit<T>(content: &str, origin: &Path) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(content).map_err(|source| StoreError::Malformed {
        path: origin.to_path_buf(),
        source,
    })
}

/// Lowercase ASCII slug: keeps `[a-z0-9]`, turns runs of whitespace, `_` and
/// `-` into a single `-`, drops everything else and trims dashes.
pub fn slugify(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch == '_' || ch == '-' || ch.is_whitespace() {
            pending_dash = true;
        }
    }

    slug
}

/// `slugify(title)-<unix millis>`.
pub fn generate_unique_slug(title: &str, unix_millis: i64) -> String {
    let base = slugify(title);
    let base = if base.is_empty() {
        FALLBACK_SLUG_BASE
    } else {
        base.as_str()
    };
    format!("{base}-{unix_millis}")
}

/// Directory name used for a category's pagination shards: lowercased, with
/// every whitespace run replaced by `-`. Non-ASCII names are kept as-is.
pub fn category_dir_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Current UTC time as an ISO-8601 string with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
