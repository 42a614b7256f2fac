mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod orchestrator;
mod render;
mod routes;
mod source;
mod state;
mod storage;
mod tailoring;
mod tracker;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::orchestrator::{Capabilities, SessionRegistry};
use crate::routes::build_router;
use crate::source::DocumentTextExtractor;
use crate::state::AppState;
use crate::storage::{
    PgApplicationStore, PgHistoryStore, RedisArtifactCache, S3DocumentArchive,
};
use crate::tailoring::LlmTailoringProvider;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!(
        "Redis client initialized (artifact TTL {}s)",
        config.artifact_cache_ttl_secs
    );

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let capabilities = Capabilities {
        extractor: Arc::new(DocumentTextExtractor),
        provider: Arc::new(LlmTailoringProvider::new(llm)),
        history: Arc::new(PgHistoryStore::new(db.clone())),
        cache: Arc::new(RedisArtifactCache::new(
            redis,
            config.artifact_cache_ttl_secs,
        )),
    };

    let state = AppState {
        sessions: SessionRegistry::new(capabilities.clone(), config.default_style),
        capabilities,
        archive: Arc::new(S3DocumentArchive::new(s3, config.s3_bucket.clone())),
        applications: Arc::new(PgApplicationStore::new(db)),
    };
    info!("New sessions start with style '{}'", config.default_style);

    state.sessions.spawn_eviction(
        SESSION_SWEEP_INTERVAL,
        Duration::from_secs(config.session_idle_ttl_secs),
    );
    info!(
        "Idle sessions expire after {}s",
        config.session_idle_ttl_secs
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "tailor-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
