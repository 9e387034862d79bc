//! Query request types

use serde::{Deserialize, Serialize};

/// `POST /chat` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question or message
    pub query: String,
}

impl ChatRequest {
    /// Create a new request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}
