//! Fixed-size page partitioning and category grouping.

use crate::{
    fsutil::category_dir_name,
    model::{PaginationMeta, PromptRecord},
};

/// Page size used when none is configured.
pub const DEFAULT_PER_PAGE: usize = 9;

/// A listing cut into pages of at most `per_page` items.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<'a, T> {
    pub meta: PaginationMeta,
    /// Page `n` (1-based) is `pages[n - 1]`.
    pub pages: Vec<&'a [T]>,
}

/// Partition `items` into `ceil(len / per_page)` pages. A `per_page` of zero
/// is treated as one.
pub fn paginate<'a, T>(items: &'a [T], per_page: usize, category: Option<&str>) -> Paginated<'a, T> {
    let per_page = per_page.max(1);
    let pages = items.chunks(per_page).collect::<Vec<_>>();
    Paginated {
        meta: PaginationMeta {
            category: category.map(str::to_string),
            total: items.len(),
            per_page,
            total_pages: items.len().div_ceil(per_page),
        },
        pages,
    }
}

/// Records that share one category shard directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    /// Category string of the first record in the group.
    pub category: String,
    pub dir_name: String,
    pub members: Vec<PromptRecord>,
}

/// Group records by category shard directory. Groups appear in order of
/// first appearance and keep the input order inside; uncategorised records
/// are skipped. Category strings that differ but share a directory name
/// (`Web Dev` and `web dev`) land in the same group under the first name.
pub fn group_by_category(records: &[PromptRecord]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for record in records {
        let category = &record.front.category;
        if category.is_empty() {
            continue;
        }
        let dir_name = category_dir_name(category);
        match groups.iter_mut().find(|group| group.dir_name == dir_name) {
            Some(group) => {
                if group.category != *category {
                    tracing::warn!(
                        "Category {category:?} shares shard directory {dir_name} with {:?}",
                        group.category
                    );
                }
                group.members.push(record.clone());
            },
            None => groups.push(CategoryGroup {
                category: category.clone(),
                dir_name,
                members: vec![record.clone()],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentFields, MetadataFields};

    fn record(slug: &str, category: &str) -> PromptRecord {
        PromptRecord {
            slug: slug.to_string(),
            front: ContentFields {
                category: category.to_string(),
                ..ContentFields::default()
            },
            content: String::new(),
            meta: MetadataFields::default(),
            is_new: false,
        }
    }

    #[test]
    fn pages_cover_every_item_in_order() {
        let items = (0..20).collect::<Vec<u32>>();
        let paginated = paginate(&items, DEFAULT_PER_PAGE, None);
        assert_eq!(paginated.meta.total, 20);
        assert_eq!(paginated.meta.total_pages, 3);
        assert_eq!(paginated.pages.len(), 3);
        assert_eq!(paginated.pages[2], &[18, 19]);
        assert_eq!(paginated.pages.concat(), items);
    }

    #[test]
    fn exact_multiple_and_empty_input() {
        let items = (0..18).collect::<Vec<u32>>();
        assert_eq!(paginate(&items, 9, None).meta.total_pages, 2);

        let empty = paginate::<u32>(&[], 9, Some("x"));
        assert_eq!(empty.meta.total_pages, 0);
        assert!(empty.pages.is_empty());
        assert_eq!(empty.meta.category.as_deref(), Some("x"));
    }

    #[test]
    fn zero_per_page_is_clamped() {
        let paginated = paginate(&[1, 2], 0, None);
        assert_eq!(paginated.meta.per_page, 1);
        assert_eq!(paginated.meta.total_pages, 2);
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let records = vec![
            record("a", "B"),
            record("b", "A"),
            record("c", ""),
            record("d", "B"),
            record("e", "Web Dev"),
        ];
        let groups = group_by_category(&records);
        let summary = groups
            .iter()
            .map(|group| {
                (
                    group.category.as_str(),
                    group.dir_name.as_str(),
                    group.members.iter().map(|r| r.slug.as_str()).collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![("B", "b", vec!["a", "d"]), ("A", "a", vec!["b"]), ("Web Dev", "web-dev", vec!["e"])]
        );
    }

    #[test]
    fn categories_sharing_a_directory_are_merged() {
        let records = vec![
            record("a", "Web Dev"),
            record("b", "Data"),
            record("c", "web  dev"),
            record("d", "Web Dev"),
        ];
        let groups = group_by_category(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Web Dev");
        assert_eq!(groups[0].dir_name, "web-dev");
        let slugs = groups[0].members.iter().map(|r| r.slug.as_str()).collect::<Vec<_>>();
        assert_eq!(slugs, vec!["a", "c", "d"]);
    }
}
