use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use prompt_library_shared::{
    api::{
        CategoryMutationResponse, ErrorResponse, MessageResponse, PromptListResponse,
        PromptMutationResponse, RenderedPrompt,
    },
    audit::{audit_directory, AuditReport},
    stats::LibraryStats,
    store::rank_featured,
    CategoryDefinition, CategoryPatch, CategoryRecord, PromptDraft, PromptPatch, PromptRecord,
    StoreError,
};

use crate::{
    markdown,
    models::{LocaleQuery, PromptQuery},
    state::AppState,
};

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

pub async fn list_prompts(
    State(state): State<AppState>,
    Query(query): Query<PromptQuery>,
) -> ApiResult<Json<PromptListResponse>> {
    let mut prompts = state
        .store
        .list_all()
        .await
        .map_err(|e| store_error("Failed to load prompts", e))?;

    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        prompts.retain(|prompt| prompt.front.category == category);
    }

    // `total` counts every match; `limit` only caps the returned page.
    let limit = query.limit.unwrap_or(usize::MAX);
    let (prompts, total) = if query.featured == Some(true) {
        let total = prompts.iter().filter(|prompt| prompt.meta.featured).count();
        (rank_featured(prompts, limit), total)
    } else {
        let total = prompts.len();
        prompts.truncate(limit);
        (prompts, total)
    };

    Ok(Json(PromptListResponse {
        prompts,
        total,
    }))
}

pub async fn create_prompt(
    State(state): State<AppState>,
    body: Result<Json<PromptDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PromptRecord>)> {
    let Json(draft) = body.map_err(bad_json)?;
    let prompt = state
        .store
        .create(draft)
        .await
        .map_err(|e| store_error("Failed to create prompt", e))?;
    Ok((StatusCode::CREATED, Json(prompt)))
}

pub async fn get_prompt(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PromptRecord>> {
    let prompt = state
        .store
        .load(&slug)
        .await
        .map_err(|e| store_error("Failed to load prompt", e))?;

    match prompt {
        Some(prompt) => Ok(Json(prompt)),
        None => Err(error_response(StatusCode::NOT_FOUND, "Prompt not found")),
    }
}

pub async fn update_prompt(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Result<Json<PromptPatch>, JsonRejection>,
) -> ApiResult<Json<PromptMutationResponse>> {
    let Json(patch) = body.map_err(bad_json)?;
    let prompt = state
        .store
        .update(&slug, patch)
        .await
        .map_err(|e| store_error("Failed to update prompt", e))?;
    Ok(Json(PromptMutationResponse {
        message: "Prompt updated".to_string(),
        prompt,
    }))
}

pub async fn delete_prompt(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let existed = state
        .store
        .delete(&slug)
        .await
        .map_err(|e| store_error("Failed to delete prompt", e))?;

    if existed {
        Ok(Json(MessageResponse::new("Prompt deleted")))
    } else {
        Err(error_response(StatusCode::NOT_FOUND, "Prompt not found"))
    }
}

pub async fn render_prompt(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<RenderedPrompt>> {
    let Some(prompt) = state
        .store
        .load(&slug)
        .await
        .map_err(|e| store_error("Failed to load prompt", e))?
    else {
        return Err(error_response(StatusCode::NOT_FOUND, "Prompt not found"));
    };

    Ok(Json(RenderedPrompt {
        html: markdown::render_html(&prompt.content),
        slug: prompt.slug,
    }))
}

pub async fn list_slugs(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let slugs = state
        .store
        .list_slugs()
        .await
        .map_err(|e| store_error("Failed to list prompts", e))?;
    Ok(Json(slugs))
}

pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
) -> ApiResult<Json<Vec<CategoryRecord>>> {
    let mut categories = state
        .categories
        .list(state.store.as_ref())
        .await
        .map_err(|e| store_error("Failed to load categories", e))?;

    if let Some(locale) = query.locale.as_deref().filter(|l| !l.is_empty()) {
        state
            .translations
            .localize_categories(locale, &mut categories)
            .await;
    }

    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    body: Result<Json<CategoryDefinition>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CategoryMutationResponse>)> {
    let Json(definition) = body.map_err(bad_json)?;
    let added = state
        .categories
        .add(definition)
        .await
        .map_err(|e| store_error("Failed to add category", e))?;

    let category = with_count(&state, added).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryMutationResponse {
            message: "Category added".to_string(),
            category,
        }),
    ))
}

pub async fn replace_categories(
    State(state): State<AppState>,
    body: Result<Json<Vec<CategoryDefinition>>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(definitions) = body.map_err(bad_json)?;
    state
        .categories
        .replace_all(definitions)
        .await
        .map_err(|e| store_error("Failed to save categories", e))?;
    Ok(Json(MessageResponse::new("Categories updated")))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> ApiResult<Json<CategoryRecord>> {
    let category = state
        .categories
        .get(state.store.as_ref(), &slug)
        .await
        .map_err(|e| store_error("Failed to load categories", e))?;

    let Some(mut category) = category else {
        return Err(error_response(StatusCode::NOT_FOUND, "Category not found"));
    };
    if let Some(locale) = query.locale.as_deref().filter(|l| !l.is_empty()) {
        state
            .translations
            .localize_categories(locale, std::slice::from_mut(&mut category))
            .await;
    }
    Ok(Json(category))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Result<Json<CategoryPatch>, JsonRejection>,
) -> ApiResult<Json<CategoryMutationResponse>> {
    let Json(patch) = body.map_err(bad_json)?;
    let updated = state
        .categories
        .update(&slug, patch)
        .await
        .map_err(|e| store_error("Failed to update category", e))?;

    let category = with_count(&state, updated).await?;
    Ok(Json(CategoryMutationResponse {
        message: "Category updated".to_string(),
        category,
    }))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .categories
        .delete(&slug)
        .await
        .map_err(|e| store_error("Failed to delete category", e))?;
    Ok(Json(MessageResponse::new("Category deleted")))
}

pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<LibraryStats>> {
    let prompts = state
        .store
        .list_all()
        .await
        .map_err(|e| store_error("Failed to load prompts", e))?;
    Ok(Json(LibraryStats::from_records(&prompts)))
}

pub async fn debug_audit(State(state): State<AppState>) -> ApiResult<Json<AuditReport>> {
    let report = audit_directory(&state.prompts_dir)
        .await
        .map_err(|e| store_error("Failed to audit prompts directory", e))?;
    Ok(Json(report))
}

/// Look the category up again so the response carries its live count.
async fn with_count(state: &AppState, definition: CategoryDefinition) -> ApiResult<CategoryRecord> {
    let found = state
        .categories
        .get(state.store.as_ref(), &definition.slug)
        .await
        .map_err(|e| store_error("Failed to load categories", e))?;
    Ok(found.unwrap_or_else(|| CategoryRecord::from_definition(definition, 0)))
}

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            code: status.as_u16(),
        }),
    )
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    error_response(StatusCode::BAD_REQUEST, rejection.body_text())
}

fn store_error(message: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(what) => error_response(StatusCode::NOT_FOUND, format!("Not found: {what}")),
        StoreError::Invalid(reason) => error_response(StatusCode::BAD_REQUEST, reason),
        StoreError::Conflict(what) => {
            error_response(StatusCode::CONFLICT, format!("Already exists: {what}"))
        },
        err => internal_error(message, err),
    }
}

fn internal_error(message: &str, err: impl std::fmt::Display) -> ApiError {
    tracing::error!("{}: {}", message, err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}
