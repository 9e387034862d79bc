//! RAG HTTP server binary
//!
//! Run with: cargo run -p sil-rag --bin sil-rag-server -- --config sil-rag.toml

use clap::Parser;
use std::path::PathBuf;

use sil_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "sil-rag-server", version, about = "Document Q&A over HTTP")]
struct Args {
    /// Config file (defaults to ./sil-rag.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sil_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = RagConfig::load(args.config.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {} ({} dims)", config.embeddings.model, config.embeddings.dimensions);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!("  - Collection: {}", config.collection_name());
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let server = RagServer::new(config)?;

    let readiness = server.state().pipeline().readiness().await;
    if !readiness.ok {
        tracing::warn!(
            "Providers not ready (embedder: {}, generator: {}, index: {}); is `ollama serve` running?",
            readiness.embedder,
            readiness.generator,
            readiness.index
        );
    }

    println!("\nServer starting on http://{}", server.address());
    println!("  POST /chat     - Ask a question");
    println!("  POST /upload   - Upload a document (multipart field 'file')");
    println!("  GET  /healthz  - Liveness");
    println!("  GET  /readyz   - Provider readiness");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
