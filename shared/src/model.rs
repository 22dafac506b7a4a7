use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::frontmatter::PromptDocument;

/// Records created within this many days are flagged `isNew`.
pub const NEW_PROMPT_WINDOW_DAYS: i64 = 7;

/// Fields owned by the markdown front matter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFields {
    pub title: String,
    pub description: String,
    /// Category display name, matched against [`CategoryDefinition::name`].
    pub category: String,
    pub author: String,
    pub tags: Vec<String>,
}

/// Fields owned by the `<slug>.json` sidecar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataFields {
    /// Shown in the featured listing.
    pub featured: bool,
    /// Featured ordering key; missing ranks as zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// ISO-8601 creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// ISO-8601 time of the last edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub views: u64,
    pub likes: u64,
    pub usage_count: u64,
    pub favorite_count: u64,
}

impl MetadataFields {
    /// Sidecar JSON object as written to disk. Engagement counters are only
    /// emitted when non-zero so files stripped by `update-json-files` stay
    /// stripped.
    pub fn to_sidecar_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("featured".into(), Value::Bool(self.featured));
        if let Some(rating) = self.rating {
            map.insert("rating".into(), Value::from(rating));
        }
        if let Some(created_at) = &self.created_at {
            map.insert("createdAt".into(), Value::String(created_at.clone()));
        }
        if let Some(updated_at) = &self.updated_at {
            map.insert("updatedAt".into(), Value::String(updated_at.clone()));
        }
        for (key, count) in [
            ("views", self.views),
            ("likes", self.likes),
            ("usageCount", self.usage_count),
            ("favoriteCount", self.favorite_count),
        ] {
            if count > 0 {
                map.insert(key.into(), Value::from(count));
            }
        }
        Value::Object(map)
    }
}

/// A prompt as served to readers: front matter, body and sidecar metadata
/// merged under one slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    pub slug: String,
    #[serde(flatten)]
    pub front: ContentFields,
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub meta: MetadataFields,
    /// Derived from `createdAt`, never persisted.
    #[serde(default)]
    pub is_new: bool,
}

impl PromptRecord {
    /// Merge a parsed markdown document with its sidecar.
    ///
    /// Each field has exactly one owner, so the result does not depend on the
    /// order the two sources are read in: content fields come from the front
    /// matter only, metadata fields from the sidecar only. Dates missing from
    /// the sidecar fall back to legacy front-matter dates, then to
    /// `file_time`; `updatedAt` finally falls back to `createdAt`.
    pub fn from_sources(
        slug: String,
        document: PromptDocument,
        mut meta: MetadataFields,
        file_time: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let PromptDocument {
            fields,
            legacy,
            body,
        } = document;

        if meta.created_at.is_none() {
            meta.created_at = legacy.created_at.or(legacy.date).or(file_time);
        }
        if meta.updated_at.is_none() {
            let created_at = meta.created_at.clone();
            meta.updated_at = legacy.updated_at.or(created_at);
        }

        let is_new = is_new_at(meta.created_at.as_deref(), now);
        Self {
            slug,
            front: fields,
            content: body,
            meta,
            is_new,
        }
    }

    pub fn created_timestamp(&self) -> Option<DateTime<Utc>> {
        self.meta.created_at.as_deref().and_then(parse_timestamp)
    }

    /// Rating used for ordering; a missing rating counts as zero.
    pub fn rating_or_zero(&self) -> f64 {
        self.meta.rating.unwrap_or(0.0)
    }

    pub fn refresh_is_new(&mut self, now: DateTime<Utc>) {
        self.is_new = is_new_at(self.meta.created_at.as_deref(), now);
    }
}

/// Input for creating a prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: String,
    pub tags: Vec<String>,
    pub content: String,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Requested slug; sanitised with the slug rules, no timestamp appended.
    #[serde(alias = "customFileName", skip_serializing_if = "Option::is_none")]
    pub custom_slug: Option<String>,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_count: Option<u64>,
}

impl PromptPatch {
    pub fn apply(self, record: &mut PromptRecord) {
        let front = &mut record.front;
        if let Some(title) = self.title {
            front.title = title;
        }
        if let Some(description) = self.description {
            front.description = description;
        }
        if let Some(category) = self.category {
            front.category = category;
        }
        if let Some(author) = self.author {
            front.author = author;
        }
        if let Some(tags) = self.tags {
            front.tags = tags;
        }
        if let Some(content) = self.content {
            record.content = content;
        }

        let meta = &mut record.meta;
        if let Some(featured) = self.featured {
            meta.featured = featured;
        }
        if self.rating.is_some() {
            meta.rating = self.rating;
        }
        if self.created_at.is_some() {
            meta.created_at = self.created_at;
        }
        if let Some(views) = self.views {
            meta.views = views;
        }
        if let Some(likes) = self.likes {
            meta.likes = likes;
        }
        if let Some(usage_count) = self.usage_count {
            meta.usage_count = usage_count;
        }
        if let Some(favorite_count) = self.favorite_count {
            meta.favorite_count = favorite_count;
        }
    }
}

/// Persisted category entry. `count` is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryDefinition {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_key: Option<String>,
    pub icon: String,
}

/// Category with its live prompt count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_key: Option<String>,
    pub icon: String,
    #[serde(default)]
    pub count: usize,
    /// Localised label, filled only when a locale is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl CategoryRecord {
    pub fn from_definition(definition: CategoryDefinition, count: usize) -> Self {
        Self {
            slug: definition.slug,
            name: definition.name,
            name_key: definition.name_key,
            icon: definition.icon,
            count,
            display_name: None,
        }
    }
}

/// Partial category update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub name_key: Option<String>,
    pub icon: Option<String>,
}

/// Entry of `prompts-index.json`; carries no body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub date: String,
}

impl From<&PromptRecord> for IndexEntry {
    fn from(record: &PromptRecord) -> Self {
        let title = if record.front.title.trim().is_empty() {
            record.slug.clone()
        } else {
            record.front.title.clone()
        };
        Self {
            slug: record.slug.clone(),
            title,
            description: record.front.description.clone(),
            category: record.front.category.clone(),
            tags: record.front.tags.clone(),
            date: record.meta.created_at.clone().unwrap_or_default(),
        }
    }
}

/// `meta.json` of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub total: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// Parse the date formats found in prompt files: RFC 3339, naive
/// date-times (taken as UTC) and bare `YYYY-MM-DD` dates (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

/// Whether a record created at `created_at` is still inside the "new" window
/// at `now`. Unparsable dates are never new.
pub fn is_new_at(created_at: Option<&str>, now: DateTime<Utc>) -> bool {
    created_at
        .and_then(parse_timestamp)
        .map(|created| now.signed_duration_since(created) < Duration::days(NEW_PROMPT_WINDOW_DAYS))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::frontmatter::{LegacyDates, PromptDocument};

    fn document(title: &str) -> PromptDocument {
        PromptDocument {
            fields: ContentFields {
                title: title.to_string(),
                ..ContentFields::default()
            },
            legacy: LegacyDates::default(),
            body: "body".to_string(),
        }
    }

    #[test]
    fn parse_timestamp_accepts_known_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single();
        assert_eq!(parse_timestamp("2024-03-01"), expected);
        assert_eq!(parse_timestamp("2024-03-01T00:00:00Z"), expected);
        assert_eq!(parse_timestamp("2024-03-01T08:00:00+08:00"), expected);
        assert_eq!(parse_timestamp("2024-03-01T00:00:00.000"), expected);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn is_new_uses_seven_day_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).single().expect("valid date");
        assert!(is_new_at(Some("2024-03-04T12:00:01Z"), now));
        assert!(!is_new_at(Some("2024-03-03T12:00:00Z"), now));
        assert!(!is_new_at(Some("not a date"), now));
        assert!(!is_new_at(None, now));
    }

    #[test]
    fn sidecar_dates_win_over_legacy_front_matter_dates() {
        let mut doc = document("A");
        doc.legacy.created_at = Some("2020-01-01".to_string());
        let meta = MetadataFields {
            created_at: Some("2024-01-01".to_string()),
            ..MetadataFields::default()
        };
        let record = PromptRecord::from_sources("a".into(), doc, meta, None, Utc::now());
        assert_eq!(record.meta.created_at.as_deref(), Some("2024-01-01"));
        assert_eq!(record.meta.updated_at.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn missing_dates_fall_back_to_legacy_then_file_time() {
        let mut doc = document("A");
        doc.legacy.date = Some("2023-05-05".to_string());
        let record = PromptRecord::from_sources(
            "a".into(),
            doc,
            MetadataFields::default(),
            Some("2022-01-01T00:00:00.000Z".to_string()),
            Utc::now(),
        );
        assert_eq!(record.meta.created_at.as_deref(), Some("2023-05-05"));

        let record = PromptRecord::from_sources(
            "b".into(),
            document("B"),
            MetadataFields::default(),
            Some("2022-01-01T00:00:00.000Z".to_string()),
            Utc::now(),
        );
        assert_eq!(record.meta.created_at.as_deref(), Some("2022-01-01T00:00:00.000Z"));
    }

    #[test]
    fn record_serializes_flat_camel_case() {
        let meta = MetadataFields {
            featured: true,
            rating: Some(8.5),
            created_at: Some("2024-01-01".to_string()),
            usage_count: 3,
            ..MetadataFields::default()
        };
        let record = PromptRecord::from_sources("slug-1".into(), document("T"), meta, None, Utc::now());
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["slug"], "slug-1");
        assert_eq!(value["title"], "T");
        assert_eq!(value["featured"], true);
        assert_eq!(value["usageCount"], 3);
        assert_eq!(value["createdAt"], "2024-01-01");
        assert_eq!(value["isNew"], false);

        let back: PromptRecord = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, record);
    }

    #[test]
    fn sidecar_json_omits_zero_counters() {
        let meta = MetadataFields {
            featured: false,
            created_at: Some("2024-01-01".to_string()),
            likes: 2,
            ..MetadataFields::default()
        };
        let value = meta.to_sidecar_json();
        let object = value.as_object().expect("object");
        assert_eq!(object.get("likes"), Some(&Value::from(2u64)));
        assert!(!object.contains_key("views"));
        assert!(!object.contains_key("rating"));
        assert!(!object.contains_key("isNew"));
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut record =
            PromptRecord::from_sources("a".into(), document("Old"), MetadataFields::default(), None, Utc::now());
        PromptPatch {
            title: Some("New".to_string()),
            rating: Some(9.0),
            ..PromptPatch::default()
        }
        .apply(&mut record);
        assert_eq!(record.front.title, "New");
        assert_eq!(record.meta.rating, Some(9.0));
        assert_eq!(record.content, "body");
    }
}
