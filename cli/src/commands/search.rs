use std::{fs, path::Path};

use anyhow::{Context, Result};
use prompt_library_shared::{search::search_index, IndexEntry};

pub fn run(index_path: &Path, query: &str) -> Result<()> {
    let raw = fs::read_to_string(index_path).with_context(|| {
        format!("failed to read {}; run `pl-cli generate-index` first", index_path.display())
    })?;
    let entries: Vec<IndexEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid index file {}", index_path.display()))?;

    let matches = search_index(&entries, query);
    if matches.is_empty() {
        println!("no prompts match {query:?}");
        return Ok(());
    }
    for entry in &matches {
        println!("{}  {}  [{}]", entry.slug, entry.title, entry.category);
    }
    println!("{} of {} prompts", matches.len(), entries.len());
    Ok(())
}
