//! Core `FeedbackGenerator` trait and streaming `HttpGenerator`.
//!
//! The generation collaborator takes `{prompt}` as JSON and answers with a
//! streamed plain-text body (not JSON). The stream is consumed to
//! completion and concatenated into one string before the pipeline proceeds
//! — partial fragments are never used.

use async_trait::async_trait;
use futures::StreamExt;

use crate::config::ServicesConfig;
use crate::services::ServiceError;

// ---------------------------------------------------------------------------
// FeedbackGenerator trait
// ---------------------------------------------------------------------------

/// Async trait for prompt → generated text.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn FeedbackGenerator>`).
#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    /// Submit `prompt` and return the fully assembled response text.
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

// ---------------------------------------------------------------------------
// HttpGenerator
// ---------------------------------------------------------------------------

/// POSTs `{prompt}` to the configured generation endpoint and drains the
/// streamed text body.
pub struct HttpGenerator {
    client: reqwest::Client,
    config: ServicesConfig,
}

impl HttpGenerator {
    /// Build an `HttpGenerator` from application config.
    pub fn from_config(config: &ServicesConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl FeedbackGenerator for HttpGenerator {
    /// Send `prompt` and consume the response stream to its end.
    ///
    /// Raw bytes are accumulated and decoded once after the final fragment,
    /// so a multi-byte UTF-8 sequence split across fragments is never
    /// mis-decoded.
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let mut req = self
            .client
            .post(self.config.generate_url())
            .json(&serde_json::json!({ "prompt": prompt }));

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        let mut stream = response.bytes_stream();
        let mut raw: Vec<u8> = Vec::new();

        while let Some(fragment) = stream.next().await {
            let bytes = fragment.map_err(|e| ServiceError::Request(e.to_string()))?;
            raw.extend_from_slice(&bytes);
        }

        if raw.is_empty() {
            return Err(ServiceError::EmptyBody);
        }

        let text = String::from_utf8_lossy(&raw).into_owned();
        log::debug!("generate: received {} bytes of feedback", text.len());
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// MockGenerator  (test-only)
// ---------------------------------------------------------------------------

/// A test double that replays queued responses and records every prompt it
/// was given, so tests can assert what the pipeline actually sent.
#[cfg(test)]
pub struct MockGenerator {
    replies: std::sync::Mutex<std::collections::VecDeque<Result<String, ServiceError>>>,
    prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockGenerator {
    /// A generator with no queued replies; each call fails with
    /// [`ServiceError::EmptyBody`] until replies are pushed.
    pub fn new() -> Self {
        Self {
            replies: std::sync::Mutex::new(std::collections::VecDeque::new()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply.
    pub fn push_ok(&self, text: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    /// Queue a failure.
    pub fn push_err(&self, err: ServiceError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl FeedbackGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ServiceError::EmptyBody))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
