//! JSON bodies exchanged over the admin HTTP API. Shared by the backend and
//! [`crate::store::HttpContentStore`] so both sides agree on the wire shape.

use serde::{Deserialize, Serialize};

use crate::model::{CategoryRecord, PromptRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptListResponse {
    pub prompts: Vec<PromptRecord>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMutationResponse {
    pub message: String,
    pub prompt: PromptRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMutationResponse {
    pub message: String,
    pub category: CategoryRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body: `{ "error": "...", "code": 404 }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// Markdown body rendered to HTML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub slug: String,
    pub html: String,
}
