use serde::Deserialize;

/// `GET /api/prompts` filters.
#[derive(Debug, Default, Deserialize)]
pub struct PromptQuery {
    /// Exact category name.
    #[serde(default)]
    pub category: Option<String>,
    /// `true` keeps featured prompts only, ordered by rating.
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    #[serde(default)]
    pub locale: Option<String>,
}
