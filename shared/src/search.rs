use crate::model::IndexEntry;

/// Case-insensitive substring search over title, description and tags.
/// Matches keep index order. A blank query matches nothing.
pub fn search_index<'a>(entries: &'a [IndexEntry], query: &str) -> Vec<&'a IndexEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    entries
        .iter()
        .filter(|entry| {
            entry.title.to_lowercase().contains(&needle)
                || entry.description.to_lowercase().contains(&needle)
                || entry
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle))
        })
        .collect()
}
