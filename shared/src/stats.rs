//! Library-wide counts for dashboards and the `stats` command.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::PromptRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total: usize,
    pub featured: usize,
    pub new: usize,
    /// Sorted by count, highest first, then by name.
    pub categories: Vec<NamedCount>,
    pub tags: Vec<NamedCount>,
}

impl LibraryStats {
    pub fn from_records(records: &[PromptRecord]) -> Self {
        let mut categories: HashMap<&str, usize> = HashMap::new();
        let mut tags: HashMap<&str, usize> = HashMap::new();

        for record in records {
            if !record.front.category.is_empty() {
                *categories.entry(&record.front.category).or_default() += 1;
            }
            for tag in &record.front.tags {
                *tags.entry(tag).or_default() += 1;
            }
        }

        Self {
            total: records.len(),
            featured: records.iter().filter(|r| r.meta.featured).count(),
            new: records.iter().filter(|r| r.is_new).count(),
            categories: ranked(categories),
            tags: ranked(tags),
        }
    }
}

fn ranked(counts: HashMap<&str, usize>) -> Vec<NamedCount> {
    let mut out = counts
        .into_iter()
        .map(|(name, count)| NamedCount {
            name: name.to_string(),
            count,
        })
        .collect::<Vec<_>>();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentFields, MetadataFields};

    fn record(category: &str, tags: &[&str], featured: bool, is_new: bool) -> PromptRecord {
        PromptRecord {
            slug: String::new(),
            front: ContentFields {
                category: category.to_string(),
                tags: tags.iter().map(|t| (*t).to_string()).collect(),
                ..ContentFields::default()
            },
            content: String::new(),
            meta: MetadataFields {
                featured,
                ..MetadataFields::default()
            },
            is_new,
        }
    }

    #[test]
    fn counts_are_ranked_by_frequency_then_name() {
        let stats = LibraryStats::from_records(&[
            record("b", &["x", "y"], true, false),
            record("a", &["y"], false, true),
            record("b", &[], true, true),
            record("", &["z"], false, false),
        ]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.featured, 2);
        assert_eq!(stats.new, 2);
        let names = |counts: &[NamedCount]| {
            counts
                .iter()
                .map(|c| (c.name.clone(), c.count))
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&stats.categories), vec![("b".to_string(), 2), ("a".to_string(), 1)]);
        assert_eq!(
            names(&stats.tags),
            vec![("y".to_string(), 2), ("x".to_string(), 1), ("z".to_string(), 1)]
        );
    }
}
