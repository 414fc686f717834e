//! services/web/src/bin/study_hub.rs

use async_openai::{config::OpenAIConfig, Client};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use study_hub_lib::{
    adapters::{DbAdapter, GeminiAnswerAdapter, LocalFileStore},
    config::Config,
    error::AppError,
    web::{build_router, state::AppState, templates::Templates},
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Database & Run Migrations ---
    info!("Opening database {}...", config.database_url);
    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let file_store = Arc::new(LocalFileStore::new(config.upload_dir.clone()));
    file_store.ensure_root().await?;
    info!("Storing uploads in {}", config.upload_dir.display());

    let openai_config = OpenAIConfig::new()
        .with_api_key(&config.gemini_api_key)
        .with_api_base(&config.gemini_api_base);
    let answer_generator = Arc::new(GeminiAnswerAdapter::new(
        Client::with_config(openai_config),
        config.qa_model.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        files: file_store,
        answer_generator,
        templates: Arc::new(Templates::new()?),
        config: config.clone(),
    });

    // --- 5. Start the Server ---
    let app = build_router(app_state);
    info!("Starting server on http://{}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
