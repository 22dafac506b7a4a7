use anyhow::{Context, Result};
use prompt_library_shared::{store::rank_featured, ContentStore, PromptRecord};

pub async fn list(
    store: &dyn ContentStore,
    category: Option<&str>,
    featured: bool,
    limit: Option<usize>,
) -> Result<()> {
    let mut records = match category {
        Some(category) => store.by_category(category).await,
        None => store.list_all().await,
    }
    .context("failed to load prompts")?;

    let limit = limit.unwrap_or(usize::MAX);
    if featured {
        records = rank_featured(records, limit);
    } else {
        records.truncate(limit);
    }

    for record in &records {
        println!("{}", summary_line(record));
    }
    println!("{} prompts", records.len());
    Ok(())
}

pub async fn show(store: &dyn ContentStore, slug: &str, json: bool) -> Result<()> {
    let Some(record) = store
        .load(slug)
        .await
        .with_context(|| format!("failed to load prompt {slug}"))?
    else {
        anyhow::bail!("prompt {slug} not found");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{}", record.front.title);
    println!("slug:     {}", record.slug);
    println!("category: {}", record.front.category);
    println!("author:   {}", record.front.author);
    println!("tags:     {}", record.front.tags.join(", "));
    println!("created:  {}", record.meta.created_at.as_deref().unwrap_or("-"));
    println!("updated:  {}", record.meta.updated_at.as_deref().unwrap_or("-"));
    if !record.front.description.is_empty() {
        println!("\n{}", record.front.description);
    }
    println!("\n{}", record.content.trim_end());
    Ok(())
}

pub async fn delete(store: &dyn ContentStore, slug: &str) -> Result<()> {
    let existed = store
        .delete(slug)
        .await
        .with_context(|| format!("failed to delete prompt {slug}"))?;
    if existed {
        tracing::info!("Deleted prompt {slug}");
    } else {
        tracing::warn!("Prompt {slug} did not exist");
    }
    Ok(())
}

fn summary_line(record: &PromptRecord) -> String {
    let mut flags = String::new();
    if record.meta.featured {
        flags.push('*');
    }
    if record.is_new {
        flags.push('+');
    }
    format!(
        "{:<2} {:<40} {:<12} {}",
        flags,
        record.slug,
        record.front.category,
        record.meta.created_at.as_deref().unwrap_or("-")
    )
}
