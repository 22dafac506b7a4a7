//! Consistency checks over a prompts directory: markdown files without a
//! sidecar, sidecars without markdown, and sidecars that do not parse.

use std::{collections::BTreeSet, io::ErrorKind, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub directory: String,
    pub exists: bool,
    pub markdown_files: usize,
    pub sidecar_files: usize,
    /// `.json` without a matching `.md`.
    pub orphaned_sidecars: Vec<String>,
    /// `.md` without a matching `.json`.
    pub missing_sidecars: Vec<String>,
    pub malformed_sidecars: Vec<String>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned_sidecars.is_empty()
            && self.missing_sidecars.is_empty()
            && self.malformed_sidecars.is_empty()
    }
}

pub async fn audit_directory(dir: &Path) -> StoreResult<AuditReport> {
    let mut report = AuditReport {
        directory: dir.display().to_string(),
        ..AuditReport::default()
    };

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(report),
        Err(err) => return Err(StoreError::io(dir, err)),
    };
    report.exists = true;

    let mut markdown = BTreeSet::new();
    let mut sidecars = BTreeSet::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| StoreError::io(dir, err))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(slug) = name.strip_suffix(".md") {
            markdown.insert(slug.to_string());
        } else if let Some(slug) = name.strip_suffix(".json") {
            sidecars.insert(slug.to_string());
        }
    }

    for slug in &sidecars {
        let path = dir.join(format!("{slug}.json"));
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| StoreError::io(&path, err))?;
        if !serde_json::from_str::<serde_json::Value>(&raw).is_ok_and(|value| value.is_object()) {
            report.malformed_sidecars.push(slug.clone());
        }
    }

    report.markdown_files = markdown.len();
    report.sidecar_files = sidecars.len();
    report.orphaned_sidecars = sidecars.difference(&markdown).cloned().collect();
    report.missing_sidecars = markdown.difference(&sidecars).cloned().collect();

    if !report.is_clean() {
        tracing::warn!(
            "Audit of {}: {} orphaned, {} missing, {} malformed",
            report.directory,
            report.orphaned_sidecars.len(),
            report.missing_sidecars.len(),
            report.malformed_sidecars.len()
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_each_kind_of_inconsistency() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        for (name, content) in [
            ("ok.md", "---\ntitle: ok\n---\n"),
            ("ok.json", "{\"featured\": false}"),
            ("lonely.md", "body"),
            ("orphan.json", "{}"),
            ("bad.md", "body"),
            ("bad.json", "{ nope"),
            ("notes.txt", "ignored"),
        ] {
            std::fs::write(root.join(name), content).expect("write");
        }

        let report = audit_directory(root).await.expect("audit");
        assert!(report.exists);
        assert_eq!(report.markdown_files, 3);
        assert_eq!(report.sidecar_files, 3);
        assert_eq!(report.orphaned_sidecars, vec!["orphan"]);
        assert_eq!(report.missing_sidecars, vec!["lonely"]);
        assert_eq!(report.malformed_sidecars, vec!["bad"]);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn missing_directory_is_clean_but_flagged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = audit_directory(&dir.path().join("nope")).await.expect("audit");
        assert!(!report.exists);
        assert!(report.is_clean());
    }
}
