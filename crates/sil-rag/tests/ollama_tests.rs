//! Ollama providers against a mock Ollama server on a local port

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use sil_rag::config::{EmbeddingConfig, LlmConfig};
use sil_rag::error::Error;
use sil_rag::providers::{EmbeddingProvider, GenerationProvider, OllamaClient, OllamaEmbedder, OllamaLlm};

async fn embeddings(Json(request): Json<Value>) -> Json<Value> {
    let dims = if request["model"] == "tiny" { 2 } else { 3 };
    Json(json!({ "embedding": vec![0.5f32; dims] }))
}

async fn generate(Json(request): Json<Value>) -> Response {
    let model = request["model"].as_str().unwrap_or_default().to_string();
    if model == "missing" {
        return (StatusCode::NOT_FOUND, "model 'missing' not found").into_response();
    }

    if request["stream"] == true {
        let body = [
            json!({ "response": "The sky ", "done": false }),
            json!({ "response": "is blue.", "done": false }),
            json!({ "response": "", "done": true }),
        ]
        .iter()
        .map(|v| format!("{}\n", v))
        .collect::<String>();
        return ([("content-type", "application/x-ndjson")], body).into_response();
    }

    let temperature = request["options"]["temperature"].as_f64().unwrap_or(-1.0);
    Json(json!({
        "response": format!("{} at {:.1}", model, temperature),
        "done": true
    }))
    .into_response()
}

async fn spawn_mock() -> String {
    let app = Router::new()
        .route("/api/embeddings", post(embeddings))
        .route("/api/generate", post(generate))
        .route("/api/tags", get(|| async { Json(json!({ "models": [] })) }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn llm_config(base_url: &str) -> LlmConfig {
    LlmConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..LlmConfig::default()
    }
}

fn embedder(client: Arc<OllamaClient>, model: &str, dimensions: usize) -> OllamaEmbedder {
    OllamaEmbedder::new(
        client,
        &EmbeddingConfig {
            model: model.to_string(),
            dimensions,
        },
    )
}

#[tokio::test]
async fn generates_non_streaming() {
    let base = spawn_mock().await;
    let llm = OllamaLlm::new(Arc::new(OllamaClient::new(&llm_config(&base)).unwrap()));

    let answer = llm.complete("prompt", "mistral", false).await.unwrap();
    assert_eq!(answer, "mistral at 0.2");
    assert!(llm.health_check().await.unwrap());
}

#[tokio::test]
async fn concatenates_streamed_output() {
    let base = spawn_mock().await;
    let llm = OllamaLlm::new(Arc::new(OllamaClient::new(&llm_config(&base)).unwrap()));

    let answer = llm.complete("prompt", "mistral", true).await.unwrap();
    assert_eq!(answer, "The sky is blue.");
}

#[tokio::test]
async fn non_success_status_is_generation_error_with_body() {
    let base = spawn_mock().await;
    let llm = OllamaLlm::new(Arc::new(OllamaClient::new(&llm_config(&base)).unwrap()));

    match llm.complete("prompt", "missing", false).await {
        Err(Error::Generation(message)) => {
            assert!(message.contains("404"));
            assert!(message.contains("model 'missing' not found"));
        }
        other => panic!("expected generation error, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_server_is_generation_error() {
    // Nothing listens on the discard port
    let llm = OllamaLlm::new(Arc::new(
        OllamaClient::new(&llm_config("http://127.0.0.1:9")).unwrap(),
    ));

    assert!(matches!(
        llm.complete("prompt", "mistral", false).await,
        Err(Error::Generation(_))
    ));
    assert!(!llm.health_check().await.unwrap());
}

#[tokio::test]
async fn embeds_with_expected_dimensions() {
    let base = spawn_mock().await;
    let client = Arc::new(OllamaClient::new(&llm_config(&base)).unwrap());

    let embedder = embedder(client, "nomic-embed-text", 3);
    let vectors = embedder
        .embed_batch(&["a".to_string(), "b".to_string()])
        .await
        .unwrap();
    assert_eq!(vectors.len(), 2);
    assert!(vectors.iter().all(|v| v.len() == 3));
}

#[tokio::test]
async fn embedding_with_wrong_dimensions_fails_fast() {
    let base = spawn_mock().await;
    let client = Arc::new(OllamaClient::new(&llm_config(&base)).unwrap());

    let embedder = embedder(client, "tiny", 3);
    assert!(matches!(
        embedder.embed("text").await,
        Err(Error::DimensionMismatch { expected: 3, actual: 2, .. })
    ));
}
