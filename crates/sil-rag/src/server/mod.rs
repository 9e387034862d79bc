//! HTTP server for the RAG assistant

pub mod routes;
pub mod state;

use axum::{http::HeaderValue, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::{RagConfig, ServerConfig};
use crate::error::{Error, Result};
use state::AppState;

/// RAG HTTP Server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a server with the Ollama-backed pipeline
    pub fn new(config: RagConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Create a server around existing state
    pub fn with_state(config: RagConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Result<Router> {
        build_router(&self.config.server, self.state.clone())
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router()?;

        tracing::info!("Starting RAG server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Router with CORS, tracing and the request body limit applied
pub fn build_router(config: &ServerConfig, state: AppState) -> Result<Router> {
    Ok(routes::routes(config.max_upload_size)
        .with_state(state)
        // applied bottom to top: CORS is outermost
        .layer(RequestBodyLimitLayer::new(config.max_upload_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins)?))
}

/// CORS for the configured origins, with credentials
///
/// Credentials rule out wildcards, so methods and headers mirror the preflight.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|e| Error::Config(format!("Invalid CORS origin '{}': {}", o, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_origin_is_config_error() {
        assert!(matches!(
            cors_layer(&["http://ok:3000".into(), "bad\norigin".into()]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_default_origins_are_valid() {
        assert!(cors_layer(&ServerConfig::default().cors_origins).is_ok());
    }
}
