//! LLM Client module for SiteReport
//!
//! Provides the client trait and the OpenAI-compatible implementation used
//! for report generation.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use openai::{EMPTY_RESPONSE_TEXT, OpenAIClient};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Only OpenAI-compatible endpoints are supported ("openai", or "groq" as
/// an alias since Groq serves the same API).
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "openai" | "groq" => Ok(Arc::new(OpenAIClient::from_config(config)?)),
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::UnknownProvider(other.to_string()))
        }
    }
}
