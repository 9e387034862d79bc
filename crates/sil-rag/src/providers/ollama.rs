//! Ollama-based providers for embeddings and generation
//!
//! Both providers share one `OllamaClient`. Calls are not retried: a failure
//! is reported to the caller immediately, and the reqwest client timeout
//! bounds how long any call can wait.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::GenerationProvider;

/// Ollama HTTP API client
pub struct OllamaClient {
    client: Client,
    base_url: String,
    temperature: f32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding
    pub async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbedRequest {
            model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "Embedding failed: HTTP {} - {}",
                status, body
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

        Ok(embed_response.embedding)
    }

    /// Complete a prompt
    pub async fn generate(&self, model: &str, prompt: &str, stream: bool) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model,
            prompt,
            stream,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        tracing::debug!("Generating with model {} (stream: {})", model, stream);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::generation(format!("Ollama request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!(
                "Ollama error: HTTP {} - {}",
                status, body
            )));
        }

        if !stream {
            let generate_response: GenerateResponse = response.json().await.map_err(|e| {
                Error::generation(format!("Failed to parse generation response: {}", e))
            })?;
            return Ok(generate_response.response);
        }

        // NDJSON: one GenerateResponse per line, lines may straddle network chunks
        let mut bytes = response.bytes_stream();
        let mut pending: Vec<u8> = Vec::new();
        let mut output = String::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|e| Error::generation(format!("Stream error: {}", e)))?;
            pending.extend_from_slice(&chunk);

            while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = pending.drain(..=pos).collect();
                if append_stream_line(&line, &mut output)? {
                    return Ok(output);
                }
            }
        }
        append_stream_line(&pending, &mut output)?;

        Ok(output)
    }
}

/// Append one NDJSON line's text; returns true on the final (`done`) line
fn append_stream_line(line: &[u8], output: &mut String) -> Result<bool> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim();
    if line.is_empty() {
        return Ok(false);
    }

    let part: GenerateResponse = serde_json::from_str(line)
        .map_err(|e| Error::generation(format!("Malformed stream line: {}", e)))?;
    output.push_str(&part.response);
    Ok(part.done)
}

/// Ollama embedding provider using nomic-embed-text or similar models
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    dimensions: usize,
    model: String,
}

impl OllamaEmbedder {
    /// Create from an existing OllamaClient
    pub fn new(client: Arc<OllamaClient>, config: &EmbeddingConfig) -> Self {
        Self {
            client,
            dimensions: config.dimensions,
            model: config.model.clone(),
        }
    }

    /// Embedding model name
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.client.embed(&self.model, text).await?;

        if embedding.len() != self.dimensions {
            return Err(Error::DimensionMismatch {
                collection: format!("model:{}", self.model),
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama generation provider
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
}

impl OllamaLlm {
    /// Create from an existing OllamaClient
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }

    /// Get the underlying client
    pub fn client(&self) -> &Arc<OllamaClient> {
        &self.client
    }
}

#[async_trait]
impl GenerationProvider for OllamaLlm {
    async fn complete(&self, prompt: &str, model: &str, stream: bool) -> Result<String> {
        self.client.generate(model, prompt, stream).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
