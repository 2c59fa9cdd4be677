//! Mock LLM Provider for testing
//!
//! This module provides a mock provider that returns queued responses.

use crate::completion::{CompletionRequest, CompletionResponse};
use crate::error::{Error, Result};
use crate::provider::LlmProvider;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A queued reply: either a canned completion or a forced error.
enum QueuedReply {
    Content(String),
    Failure(String),
}

/// A mock LLM provider that returns queued responses or default empty ones.
///
/// Every request passed to [`complete`](LlmProvider::complete) is recorded
/// and can be inspected after the fact with [`requests`](Self::requests).
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<QueuedReply>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a new mock provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All requests received so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Queue a canned completion text.
    pub fn add_response(&self, content: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(QueuedReply::Content(content.into()));
    }

    /// Queue an API failure for the next call.
    pub fn add_failure(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(QueuedReply::Failure(message.into()));
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn available_models(&self) -> Vec<String> {
        vec!["mock-model".to_string()]
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let mut replies = self.replies.lock().unwrap_or_else(|e| e.into_inner());
        match replies.pop_front() {
            Some(QueuedReply::Content(content)) => Ok(CompletionResponse {
                content,
                usage: None,
                finish_reason: Some("stop".to_string()),
                model: "mock-model".to_string(),
            }),
            Some(QueuedReply::Failure(message)) => Err(Error::Api(message)),
            // Default behavior if queue empty
            None => Ok(CompletionResponse {
                content: "mock response".to_string(),
                usage: None,
                finish_reason: Some("stop".to_string()),
                model: "mock-model".to_string(),
            }),
        }
    }
}
