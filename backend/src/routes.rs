use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/prompts", get(handlers::list_prompts).post(handlers::create_prompt))
        .route(
            "/api/prompts/:slug",
            get(handlers::get_prompt)
                .put(handlers::update_prompt)
                .delete(handlers::delete_prompt),
        )
        .route("/api/prompts/:slug/html", get(handlers::render_prompt))
        .route("/api/slugs", get(handlers::list_slugs))
        .route(
            "/api/categories",
            get(handlers::list_categories)
                .post(handlers::create_category)
                .put(handlers::replace_categories),
        )
        .route(
            "/api/categories/:slug",
            get(handlers::get_category)
                .patch(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route("/api/stats", get(handlers::stats))
        .route("/api/debug", get(handlers::debug_audit))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
