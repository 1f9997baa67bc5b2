use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use censo_api::api::{self, AppState};
use censo_api::assistant::{GeminiClient, PostgresQueryExecutor, QueryAssistant};
use censo_api::config::{Config, SeedMode};
use censo_api::db::{self, BulkSeedOptions};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("censo_api=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = Config::from_env()?;

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Database connected successfully");

    db::run_migrations(&pool).await?;

    match config.seed_mode {
        SeedMode::Off => {}
        SeedMode::Demo => {
            if db::seed_demo_data(&pool).await? {
                tracing::info!("Demo census data loaded");
            }
        }
        SeedMode::Bulk => {
            if let Some(summary) = db::seed_bulk_data(&pool, &BulkSeedOptions::default()).await? {
                tracing::info!(dwellings = summary.dwellings, "Bulk census data loaded");
            }
        }
    }

    let assistant = build_assistant(&config).await?;
    let state = AppState::postgres(pool, &config.jwt_secret, assistant);

    if let Some(admin) = &config.bootstrap_admin {
        if state
            .admins
            .ensure_bootstrap_admin(&admin.username, &admin.password)
            .await?
        {
            tracing::info!(username = %admin.username, "Bootstrap administrator created");
        }
    }

    let app = api::router(state);

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the query assistant when a language model key is configured
async fn build_assistant(
    config: &Config,
) -> Result<Option<QueryAssistant>, Box<dyn Error + Send + Sync>> {
    let Some(api_key) = &config.gemini_api_key else {
        tracing::warn!("GEMINI_API_KEY not set, the query assistant is disabled");
        return Ok(None);
    };

    let assistant_pool =
        db::create_pool(&config.assistant_database_url, config.db_max_connections).await?;
    let model = GeminiClient::new(api_key.clone(), config.gemini_model.clone())?;
    tracing::info!(model = model.model(), "Query assistant enabled");

    let executor = PostgresQueryExecutor::new(assistant_pool, config.assistant_timeout_ms);
    Ok(Some(
        QueryAssistant::new(Arc::new(model), Arc::new(executor))
            .with_row_limit(config.assistant_row_limit),
    ))
}
