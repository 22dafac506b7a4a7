//! Admin HTTP API over the prompt library.

mod config;
mod handlers;
mod markdown;
mod models;
mod routes;
mod state;

use anyhow::Result;
use prompt_library_shared::logging::{init_tracing, LogConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::AppConfig::from_env()?;
    let _log_guard = init_tracing(&LogConfig {
        log_dir: config.log_dir.clone(),
        file_prefix: "prompt-library-backend.log".to_string(),
        ..LogConfig::default()
    })?;

    tracing::info!("Starting prompt library admin API");
    tracing::info!("Prompts directory: {}", config.prompts_dir.display());
    tracing::info!("Categories file: {}", config.categories_file.display());

    let app_state = state::AppState::new(&config);
    let app = routes::create_router(app_state);

    let addr = config.listen_addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
