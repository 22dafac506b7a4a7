use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};

use super::ContentStore;
use crate::{
    api::{ErrorResponse, PromptListResponse, PromptMutationResponse},
    error::{StoreError, StoreResult},
    model::{PromptDraft, PromptPatch, PromptRecord},
};

const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// [`ContentStore`] that forwards every call to a running admin API.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    base: Url,
    client: reqwest::Client,
}

impl HttpContentStore {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> StoreResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|err| StoreError::Invalid(format!("invalid api base {base_url}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::Invalid(format!("invalid api base {base_url}")));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self {
            base,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }
}

async fn error_from(response: Response) -> StoreError {
    let status = response.status();
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    match status {
        StatusCode::BAD_REQUEST => StoreError::Invalid(message),
        StatusCode::NOT_FOUND => StoreError::NotFound(message),
        StatusCode::CONFLICT => StoreError::Conflict(message),
        _ => StoreError::Http(format!("{status}: {message}")),
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn list_slugs(&self) -> StoreResult<Vec<String>> {
        let response = self.client.get(self.endpoint(&["slugs"])).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn load(&self, slug: &str) -> StoreResult<Option<PromptRecord>> {
        let slug = slug.strip_suffix(".md").unwrap_or(slug);
        let response = self
            .client
            .get(self.endpoint(&["prompts", slug]))
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            _ => Err(error_from(response).await),
        }
    }

    async fn list_all(&self) -> StoreResult<Vec<PromptRecord>> {
        let response = self.client.get(self.endpoint(&["prompts"])).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        let body: PromptListResponse = response.json().await?;
        tracing::debug!("Fetched {} prompts from {}", body.total, self.base);
        Ok(body.prompts)
    }

    async fn create(&self, draft: PromptDraft) -> StoreResult<PromptRecord> {
        let response = self
            .client
            .post(self.endpoint(&["prompts"]))
            .json(&draft)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn update(&self, slug: &str, patch: PromptPatch) -> StoreResult<PromptRecord> {
        let response = self
            .client
            .put(self.endpoint(&["prompts", slug]))
            .json(&patch)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        let body: PromptMutationResponse = response.json().await?;
        Ok(body.prompt)
    }

    async fn delete(&self, slug: &str) -> StoreResult<bool> {
        let response = self
            .client
            .delete(self.endpoint(&["prompts", slug]))
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(error_from(response).await),
        }
    }
}
