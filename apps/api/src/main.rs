mod blob;
mod config;
mod content;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;
mod tts;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::blob::S3BlobStore;
use crate::config::Config;
use crate::content::lifecycle::ContentLifecycle;
use crate::content::store::PgContentStore;
use crate::content::sweep::spawn_expiry_sweep;
use crate::db::create_pool;
use crate::generation::agents::HandlerRegistry;
use crate::generation::invoker::GenerationInvoker;
use crate::generation::style_catalog::StyleCatalog;
use crate::generation::templates::FsTemplateStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tts::{ElevenLabsClient, SpeechSynthesizer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ScriptForge API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let lifecycle = ContentLifecycle::new(
        Arc::new(PgContentStore::new(db)),
        config.content_retention_days,
    );

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let blobs = Arc::new(S3BlobStore::new(s3, config.s3_bucket.clone()));
    info!("S3 client initialized");

    // Initialize LLM client
    let model_timeout = Duration::from_secs(config.llm_timeout_secs);
    let llm = LlmClient::new(config.anthropic_api_key.clone(), model_timeout)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Speech is optional
    let speech: Option<Arc<dyn SpeechSynthesizer>> = match &config.elevenlabs_api_key {
        Some(key) => {
            let client = ElevenLabsClient::new(
                key.clone(),
                config.elevenlabs_voice_id.clone(),
                model_timeout,
            )?;
            info!("Speech synthesis enabled (voice {})", config.elevenlabs_voice_id);
            Some(Arc::new(client))
        }
        None => {
            warn!("ELEVENLABS_API_KEY not set; audio generation disabled");
            None
        }
    };

    // Persona handlers share one catalog and one template directory
    let catalog = Arc::new(StyleCatalog::builtin());
    let templates = Arc::new(FsTemplateStore::new(config.template_dir.clone()));
    let registry = Arc::new(HandlerRegistry::builtin(catalog.clone(), templates));
    let served: Vec<&str> = registry.personas().iter().map(|p| p.as_str()).collect();
    info!(
        "Persona handlers: {} (templates from {})",
        served.join(", "),
        config.template_dir.display()
    );

    spawn_expiry_sweep(
        lifecycle.clone(),
        Duration::from_secs(config.sweep_interval_secs),
    );

    // Build app state
    let state = AppState {
        catalog,
        registry,
        invoker: GenerationInvoker::new(Arc::new(llm), model_timeout),
        lifecycle,
        blobs,
        speech,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

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
        "scriptforge-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
