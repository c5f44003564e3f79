//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// Report generation issues two unrelated requests (report, then summary);
/// no conversation state is carried between calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock LLM client for unit tests
    ///
    /// Replays canned responses in order and records every request.
    pub struct MockLlmClient {
        responses: Mutex<Vec<Option<Result<CompletionResponse, LlmError>>>>,
        requests: Mutex<Vec<CompletionRequest>>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<CompletionResponse>) -> Self {
            debug!(response_count = %responses.len(), "MockLlmClient::new: called");
            Self::with_results(responses.into_iter().map(Ok).collect())
        }

        /// Replay a mix of successes and failures
        pub fn with_results(results: Vec<Result<CompletionResponse, LlmError>>) -> Self {
            Self {
                responses: Mutex::new(results.into_iter().map(Some).collect()),
                requests: Mutex::new(Vec::new()),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Convenience: plain text responses
        pub fn texts(texts: &[&str]) -> Self {
            Self::new(texts.iter().map(|t| CompletionResponse::text(*t)).collect())
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Requests received so far
        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            debug!("MockLlmClient::complete: called");
            self.requests.lock().unwrap().push(request);
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            responses.get_mut(idx).and_then(Option::take).unwrap_or_else(|| {
                debug!("MockLlmClient::complete: no more mock responses");
                Err(LlmError::InvalidResponse("No more mock responses".to_string()))
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn request() -> CompletionRequest {
            CompletionRequest::single("Test", "prompt", 1000, 0.7)
        }

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let client = MockLlmClient::texts(&["Response 1", "Response 2"]);

            let resp1 = client.complete(request()).await.unwrap();
            assert_eq!(resp1.content, Some("Response 1".to_string()));

            let resp2 = client.complete(request()).await.unwrap();
            assert_eq!(resp2.content, Some("Response 2".to_string()));

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.requests().len(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            assert!(client.complete(request()).await.is_err());
        }

        #[tokio::test]
        async fn test_mock_client_replays_errors() {
            let client = MockLlmClient::with_results(vec![Err(LlmError::ApiError {
                status: 503,
                message: "down".to_string(),
            })]);
            let err = client.complete(request()).await.unwrap_err();
            assert_eq!(err.status(), Some(503));
        }
    }
}
