//! Reading and writing the `<slug>.md` document format: a `---` delimited
//! YAML block followed by a blank line and the markdown body.

use std::path::Path;

use gray_matter::{engine::YAML, Matter};
use serde::{de::IgnoredAny, Deserialize};

use crate::model::ContentFields;

/// Date keys that older files carry in their front matter. They are only
/// used as fallbacks when the sidecar has no dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyDates {
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub date: Option<String>,
}

impl LegacyDates {
    pub fn has_created(&self) -> bool {
        self.created_at.is_some() || self.date.is_some()
    }
}

/// A parsed `.md` file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptDocument {
    pub fields: ContentFields,
    pub legacy: LegacyDates,
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawFrontMatter {
    title: Option<Scalar>,
    description: Option<Scalar>,
    category: Option<Scalar>,
    author: Option<Scalar>,
    tags: Option<TagsField>,
    created_at: Option<Scalar>,
    updated_at: Option<Scalar>,
    date: Option<Scalar>,
}

/// A front matter value read as text. Hand-written files sometimes leave
/// numbers or booleans unquoted (`title: 2024`); nested values are ignored
/// so one odd field does not discard the others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Other(IgnoredAny),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Text(text) => Some(text),
            Scalar::Integer(value) => Some(value.to_string()),
            Scalar::Float(value) => Some(value.to_string()),
            Scalar::Bool(value) => Some(value.to_string()),
            Scalar::Other(_) => None,
        }
    }
}

fn text(value: Option<Scalar>) -> Option<String> {
    value.and_then(Scalar::into_text)
}

/// Tags are a flow array in current files; a few hand-written ones use a
/// single scalar.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagsField {
    List(Vec<Scalar>),
    One(Scalar),
}

impl TagsField {
    fn into_vec(self) -> Vec<String> {
        match self {
            TagsField::List(tags) => tags.into_iter().filter_map(Scalar::into_text).collect(),
            TagsField::One(tag) => tag
                .into_text()
                .filter(|tag| !tag.trim().is_empty())
                .into_iter()
                .collect(),
        }
    }
}

/// Parse a markdown document. Malformed front matter is logged and replaced
/// by empty fields; the body is still returned.
pub fn parse_document(raw: &str, origin: &Path) -> PromptDocument {
    let matter = Matter::<YAML>::new();
    let parsed = matter.parse(raw);

    let front = match parsed.data {
        Some(data) => match data.deserialize::<RawFrontMatter>() {
            Ok(front) => front,
            Err(err) => {
                tracing::warn!("Invalid front matter in {}: {err}", origin.display());
                RawFrontMatter::default()
            },
        },
        None => RawFrontMatter::default(),
    };

    let body = strip_separator_line(&parsed.content).to_string();

    PromptDocument {
        fields: ContentFields {
            title: text(front.title).unwrap_or_default(),
            description: text(front.description).unwrap_or_default(),
            category: text(front.category).unwrap_or_default(),
            author: text(front.author).unwrap_or_default(),
            tags: front.tags.map(TagsField::into_vec).unwrap_or_default(),
        },
        legacy: LegacyDates {
            created_at: text(front.created_at),
            updated_at: text(front.updated_at),
            date: text(front.date),
        },
        body,
    }
}

/// Render content fields and body into the on-disk document format.
pub fn render_document(fields: &ContentFields, body: &str) -> String {
    let tags = fields
        .tags
        .iter()
        .map(|tag| yaml_quote(tag))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "---\ntitle: {}\ndescription: {}\ncategory: {}\nauthor: {}\ntags: [{}]\n---\n\n{}",
        yaml_quote(&fields.title),
        yaml_quote(&fields.description),
        yaml_quote(&fields.category),
        yaml_quote(&fields.author),
        tags,
        body
    )
}

/// The writer separates front matter and body with one blank line.
fn strip_separator_line(content: &str) -> &str {
    content
        .strip_prefix("\r\n")
        .or_else(|| content.strip_prefix('\n'))
        .unwrap_or(content)
}

/// Double-quoted YAML scalar.
fn yaml_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch.is_control() => out.push_str(&format!("\\u{:04x}", ch as u32)),
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn parse_reads_fields_and_body() {
        let raw = r#"---
title: "代码审查助手"
description: "Review a diff"
category: "编程开发"
author: "Ada"
tags: ["rust", "review"]
---

# Heading

Body text.
"#;
        let doc = parse_document(raw, Path::new("a.md"));
        assert_eq!(doc.fields.title, "代码审查助手");
        assert_eq!(doc.fields.description, "Review a diff");
        assert_eq!(doc.fields.category, "编程开发");
        assert_eq!(doc.fields.author, "Ada");
        assert_eq!(doc.fields.tags, vec!["rust".to_string(), "review".to_string()]);
        assert!(doc.body.trim_start().starts_with("# Heading"));
        assert!(doc.body.contains("Body text."));
    }

    #[test]
    fn parse_accepts_scalar_tags_and_legacy_dates() {
        let raw = "---\ntitle: T\ntags: solo\ncreatedAt: \"2024-02-02T00:00:00Z\"\ndate: \
                   2024-01-01\n---\nbody";
        let doc = parse_document(raw, Path::new("a.md"));
        assert_eq!(doc.fields.tags, vec!["solo".to_string()]);
        assert_eq!(doc.legacy.created_at.as_deref(), Some("2024-02-02T00:00:00Z"));
        assert_eq!(doc.legacy.date.as_deref(), Some("2024-01-01"));
        assert!(doc.legacy.has_created());
    }

    #[test]
    fn unquoted_numbers_do_not_blank_other_fields() {
        let raw = "---\ntitle: 2024\ndescription: \"Yearly review\"\ncategory: 其他\nauthor: true\ntags: \
                   [2024, ai, 1.5]\nextra:\n  nested: [1, 2]\n---\n\nbody";
        let doc = parse_document(raw, Path::new("a.md"));
        assert_eq!(doc.fields.title, "2024");
        assert_eq!(doc.fields.description, "Yearly review");
        assert_eq!(doc.fields.category, "其他");
        assert_eq!(doc.fields.author, "true");
        assert_eq!(doc.fields.tags, vec!["2024".to_string(), "ai".to_string(), "1.5".to_string()]);
        assert_eq!(doc.body.trim(), "body");
    }

    #[test]
    fn nested_value_in_one_field_keeps_the_rest() {
        let raw = "---\ntitle: [not, a, title]\ndescription: kept\n---\nbody";
        let doc = parse_document(raw, Path::new("a.md"));
        assert_eq!(doc.fields.title, "");
        assert_eq!(doc.fields.description, "kept");
    }

    #[test]
    fn document_without_front_matter_keeps_body() {
        let doc = parse_document("just text", Path::new("a.md"));
        assert_eq!(doc.fields, ContentFields::default());
        assert_eq!(doc.body.trim(), "just text");
    }

    #[test]
    fn render_then_parse_preserves_fields() {
        let fields = ContentFields {
            title: "Quote \"me\" \\ now".to_string(),
            description: "line one\nline two".to_string(),
            category: "数据分析".to_string(),
            author: "Grace".to_string(),
            tags: vec!["a, b".to_string(), "c".to_string()],
        };
        let rendered = render_document(&fields, "Body here.");
        assert!(rendered.starts_with("---\ntitle: "));
        assert!(rendered.contains("tags: [\"a, b\", \"c\"]"));

        let doc = parse_document(&rendered, Path::new("a.md"));
        assert_eq!(doc.fields, fields);
        assert_eq!(doc.body.trim(), "Body here.");
    }
}
