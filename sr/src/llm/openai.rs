//! OpenAI-compatible API client implementation
//!
//! Implements the LlmClient trait for the Chat Completions API. Works with
//! any provider exposing that shape (Groq, OpenAI, local gateways). One
//! request per call: no retries and no streaming.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// Text used when the endpoint returns no choices
pub const EMPTY_RESPONSE_TEXT: &str = "Failed to generate report";

/// OpenAI-compatible API client
pub struct OpenAIClient {
    model: String,
    /// Resolved at construction; None means every call fails before the network
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAIClient {
    /// Create a new client from configuration
    ///
    /// A missing API key does not fail construction; `complete` reports it
    /// before attempting any request so offline use of the tool still works.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = match config.api_key() {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, "from_config: no API key, network reports will fail");
                None
            }
        };

        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
            timeout,
        })
    }

    /// Endpoint URL for chat completions
    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Build the request body for the chat completions API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];

        messages.extend(request.messages.iter().map(|m| {
            serde_json::json!({
                "role": m.role.as_str(),
                "content": m.content,
            })
        }));

        let max_tokens = request.max_tokens.min(self.max_tokens);

        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": max_tokens,
        })
    }

    /// Parse the API response
    fn parse_response(&self, api_response: OpenAIResponse) -> CompletionResponse {
        debug!(choices = api_response.choices.len(), "parse_response: called");
        let choice = api_response.choices.into_iter().next();

        let (content, stop_reason) = match choice {
            Some(c) => (c.message.content, StopReason::from_finish_reason(c.finish_reason.as_deref())),
            None => {
                warn!("parse_response: no choices in response");
                (Some(EMPTY_RESPONSE_TEXT.to_string()), StopReason::EndTurn)
            }
        };

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        CompletionResponse {
            content,
            stop_reason,
            usage,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Network(e)
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("complete: missing API key, not sending");
            return Err(LlmError::MissingApiKey {
                env: self.api_key_env.clone(),
            });
        };

        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "complete: API error");
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let text = response.text().await.map_err(|e| self.map_send_error(e))?;
        let api_response: OpenAIResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::InvalidResponse(format!("{}: {}", e, text)))?;

        debug!("complete: success");
        Ok(self.parse_response(api_response))
    }
}

// Chat completions response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client(base_url: &str, api_key: Option<&str>) -> OpenAIClient {
        OpenAIClient {
            model: "llama3-8b-8192".to_string(),
            api_key: api_key.map(str::to_string),
            api_key_env: "GROQ_API_KEY".to_string(),
            base_url: base_url.to_string(),
            http: Client::new(),
            max_tokens: 2000,
            timeout: Duration::from_secs(30),
        }
    }

    /// Serve exactly one canned HTTP response and hand back the raw request
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower.strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_build_request_body_basic() {
        let client = client("https://api.groq.com/openai/v1", Some("test-key"));
        let request = CompletionRequest::single("You are helpful", "Hello", 1000, 0.7);

        let body = client.build_request_body(&request);

        assert_eq!(body["model"], "llama3-8b-8192");
        assert_eq!(body["max_tokens"], 1000);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are helpful");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Hello");
    }

    #[test]
    fn test_max_tokens_capped() {
        let client = client("https://api.groq.com/openai/v1", Some("test-key"));
        let request = CompletionRequest::single("Test", "x", 5000, 0.7);

        let body = client.build_request_body(&request);
        assert_eq!(body["max_tokens"], 2000);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = LlmConfig {
            base_url: "https://api.groq.com/openai/v1/".to_string(),
            api_key_env: "SITEREPORT_UNSET_KEY_FOR_ENDPOINT_TEST".to_string(),
            ..Default::default()
        };
        let client = OpenAIClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "https://api.groq.com/openai/v1/chat/completions");
    }

    #[test]
    fn test_parse_response_without_choices() {
        let client = client("http://unused", Some("k"));
        let parsed = client.parse_response(OpenAIResponse {
            choices: vec![],
            usage: None,
        });
        assert_eq!(parsed.content.as_deref(), Some(EMPTY_RESPONSE_TEXT));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        // Port 9 on localhost is never contacted: the key check comes first
        let client = client("http://127.0.0.1:9", None);
        let err = client
            .complete(CompletionRequest::single("s", "p", 10, 0.7))
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_complete_success_sends_bearer_and_body() {
        let body = r##"{"choices":[{"message":{"role":"assistant","content":"# Report"},"finish_reason":"stop"}],"usage":{"prompt_tokens":12,"completion_tokens":3}}"##;
        let (base_url, server) = serve_once("200 OK", body).await;

        let client = client(&base_url, Some("gsk-123"));
        let resp = client
            .complete(CompletionRequest::single("sys", "make a report", 100, 0.7))
            .await
            .unwrap();

        assert_eq!(resp.content.as_deref(), Some("# Report"));
        assert_eq!(resp.stop_reason, StopReason::EndTurn);
        assert_eq!(resp.usage.input_tokens, 12);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /chat/completions"));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer gsk-123"));
        assert!(raw.contains("make a report"));
    }

    #[tokio::test]
    async fn test_complete_non_success_is_api_error() {
        let (base_url, server) = serve_once("401 Unauthorized", r#"{"error":"bad key"}"#).await;

        let client = client(&base_url, Some("wrong"));
        let err = client
            .complete(CompletionRequest::single("s", "p", 10, 0.7))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_complete_times_out_on_silent_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            // Hold the connection open without answering
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let timeout = Duration::from_millis(300);
        let client = OpenAIClient {
            http: Client::builder().timeout(timeout).build().unwrap(),
            timeout,
            ..client(&format!("http://{}", addr), Some("k"))
        };
        let err = client
            .complete(CompletionRequest::single("s", "p", 10, 0.7))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Timeout(d) if d == timeout), "got {:?}", err);
        server.abort();
    }

    #[test]
    fn test_parse_response_length_is_max_tokens() {
        let client = client("http://unused", Some("k"));
        let body = r#"{"choices":[{"message":{"content":"partial"},"finish_reason":"length"}]}"#;
        let parsed = client.parse_response(serde_json::from_str(body).unwrap());
        assert_eq!(parsed.stop_reason, StopReason::MaxTokens);
        assert_eq!(parsed.content.as_deref(), Some("partial"));
    }

    #[tokio::test]
    async fn test_complete_garbage_body_is_invalid_response() {
        let (base_url, server) = serve_once("200 OK", "not json").await;

        let client = client(&base_url, Some("k"));
        let err = client
            .complete(CompletionRequest::single("s", "p", 10, 0.7))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::InvalidResponse(_)));
        server.await.unwrap();
    }
}
