//! Prompt templates for the three query routes

use crate::config::AssistantConfig;

/// Builds the prompt for each route
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    assistant_name: String,
}

impl PromptBuilder {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(config.name.clone())
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    /// Short, warm reply with no documents involved
    pub fn smalltalk(&self, query: &str) -> String {
        format!(
            "You are a friendly, concise assistant. Respond naturally to the user's smalltalk. \
             Keep it short and warm; don't mention documents or citations.\n\
             User: {query}\nAssistant:"
        )
    }

    /// Answer only from the rendered context block
    pub fn grounded(&self, query: &str, context: &str) -> String {
        format!(
            "You are {name}. Use ONLY the context to answer. \
             Be concise and action-oriented. If something is not covered, say you don't know.\n\n\
             {context}\n\nQuestion: {query}\n\n\
             Answer clearly. If you rely on specific facts from context, you MAY include \
             bracketed numbers [1], [2] inline.",
            name = self.assistant_name,
        )
    }

    /// Nothing relevant was retrieved: answer as a general assistant
    pub fn general(&self, query: &str) -> String {
        format!(
            "You are a helpful assistant. The user asked a general question not covered by the \
             internal documents. Answer naturally in plain English without mentioning documents \
             or citations.\nUser question: {query}\nAssistant:"
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}
