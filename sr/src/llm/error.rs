//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key not found. Set the {env} environment variable.")]
    MissingApiKey { env: String },

    #[error("AI API request failed: {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Unknown LLM provider: '{0}'. Supported: openai, groq")]
    UnknownProvider(String),
}

impl LlmError {
    /// Check if this is a configuration fault (credential or provider)
    pub fn is_configuration(&self) -> bool {
        matches!(self, LlmError::MissingApiKey { .. } | LlmError::UnknownProvider(_))
    }

    /// HTTP status of an upstream failure
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
