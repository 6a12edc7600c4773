mod catalog;
mod config;
mod db;
mod errors;
mod extract;
mod latex;
mod llm_client;
mod models;
mod orchestrator;
mod pipeline;
mod retrieval;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::CatalogSource;
use crate::config::Config;
use crate::db::create_pool;
use crate::db::jobs::PgJobStore;
use crate::latex::PdflatexCompiler;
use crate::llm_client::LlmClient;
use crate::pipeline::{OutputPaths, PipelineServices};
use crate::retrieval::{ChromaStore, EmbeddingClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    PgJobStore::ensure_schema(&db).await?;

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(config.anthropic_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize embeddings + document store
    let embedder = EmbeddingClient::new(config.openai_api_key.clone());
    let store = Arc::new(
        ChromaStore::connect(
            &config.chroma_url,
            &config.chroma_collection,
            embedder.clone(),
            config.chunk_size,
            config.chunk_overlap,
        )
        .await?,
    );

    // Job archive shares the embeddings client with the document store
    let jobs = Arc::new(PgJobStore::new(db, embedder));

    let services = PipelineServices {
        llm,
        store,
        typesetter: Arc::new(PdflatexCompiler),
        catalog: CatalogSource::new(config.data_dir.clone()),
        output: OutputPaths {
            resumes_dir: config.resumes_dir(),
            cover_letters_dir: config.cover_letters_dir(),
        },
        num_context_docs: config.num_context_docs,
    };

    // Build app state
    let state = AppState { jobs, services };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
