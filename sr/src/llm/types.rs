//! LLM request/response types for SiteReport
//!
//! Modeled on the OpenAI chat completions shape: one system prompt plus a
//! list of role-tagged text messages.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System prompt (role instruction)
    pub system_prompt: String,

    /// Conversation messages (a single user message for report generation)
    pub messages: Vec<Message>,

    /// Max tokens for response
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    /// Single-turn request with one user message
    pub fn single(system_prompt: impl Into<String>, prompt: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        debug!(%max_tokens, %temperature, "CompletionRequest::single: called");
        Self {
            system_prompt: system_prompt.into(),
            messages: vec![Message::user(prompt)],
            max_tokens,
            temperature,
        }
    }

    /// Text of the last user message, if any
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
        }
    }
}

/// Response from a completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Text content of the first choice (if any)
    pub content: Option<String>,

    /// Why the model stopped generating
    pub stop_reason: StopReason,

    /// Token usage
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Plain text response, used heavily by tests
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }
}

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    #[default]
    EndTurn,
    MaxTokens,
    ContentFilter,
}

impl StopReason {
    /// Map an OpenAI `finish_reason` string
    pub fn from_finish_reason(reason: Option<&str>) -> Self {
        match reason {
            Some("length") => StopReason::MaxTokens,
            Some("content_filter") => StopReason::ContentFilter,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
