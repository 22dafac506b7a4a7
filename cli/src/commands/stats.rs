use anyhow::{Context, Result};
use prompt_library_shared::{stats::LibraryStats, ContentStore};

const TOP_ENTRIES: usize = 10;

pub async fn run(store: &dyn ContentStore, json: bool) -> Result<()> {
    let records = store.list_all().await.context("failed to load prompts")?;
    let stats = LibraryStats::from_records(&records);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("prompts:  {}", stats.total);
    println!("featured: {}", stats.featured);
    println!("new:      {}", stats.new);
    println!("\ncategories:");
    for entry in &stats.categories {
        println!("  {:>4}  {}", entry.count, entry.name);
    }
    println!("\ntop tags:");
    for entry in stats.tags.iter().take(TOP_ENTRIES) {
        println!("  {:>4}  {}", entry.count, entry.name);
    }
    Ok(())
}
