//! Core `Transcriber` trait and `HttpTranscriber` implementation.
//!
//! The transcription collaborator accepts a multipart audio upload plus the
//! current question as query context and answers `{transcript}` on success
//! or `{error}` when the clip was rejected (moderation, decode failure, …).
//! An `{error}` payload is **not** a fault: it is surfaced as the transcript
//! so the candidate sees why the feedback reads oddly.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ServicesConfig;
use crate::services::ServiceError;
use crate::transcode::AudioTrack;

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Async trait for audio → transcript.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn Transcriber>`).
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Upload `audio` and return the transcript text.
    ///
    /// `question` travels along as query context for the service.
    async fn transcribe(&self, audio: &AudioTrack, question: &str)
        -> Result<String, ServiceError>;
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Body of a 200 response: exactly one of the two fields is populated.
#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    transcript: Option<String>,
    error: Option<String>,
}

/// Collapse the two-field wire format into the transcript the pipeline uses.
///
/// An `error` payload takes precedence and becomes the transcript value —
/// the deployed contract, not a bug.
fn transcript_from(body: TranscribeResponse) -> Result<String, ServiceError> {
    if let Some(error) = body.error {
        log::warn!("transcribe: service rejected the clip: {error}");
        return Ok(error);
    }
    body.transcript
        .ok_or_else(|| ServiceError::Parse("neither transcript nor error present".into()))
}

// ---------------------------------------------------------------------------
// HttpTranscriber
// ---------------------------------------------------------------------------

/// Calls the configured transcription endpoint with a multipart upload.
pub struct HttpTranscriber {
    client: reqwest::Client,
    config: ServicesConfig,
}

impl HttpTranscriber {
    /// Build an `HttpTranscriber` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`. A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
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
impl Transcriber for HttpTranscriber {
    /// POST the audio as `file` plus the model name, with the question as a
    /// query parameter.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when
    /// `config.api_key` is `Some(key)` and `key` is non-empty.
    async fn transcribe(
        &self,
        audio: &AudioTrack,
        question: &str,
    ) -> Result<String, ServiceError> {
        let part = reqwest::multipart::Part::bytes(audio.data.clone())
            .file_name(audio.file_name())
            .mime_str("audio/mpeg")
            .map_err(|e| ServiceError::Request(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.transcription_model.clone());

        let mut req = self
            .client
            .post(self.config.transcribe_url())
            .query(&[("question", question)])
            .multipart(form);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        let body: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        transcript_from(body)
    }
}

// ---------------------------------------------------------------------------
// MockTranscriber  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured transcript without any I/O.
#[cfg(test)]
pub struct MockTranscriber {
    reply: Result<String, u16>,
}

#[cfg(test)]
impl MockTranscriber {
    /// A transcriber that always returns `Ok(text)`.
    pub fn ok(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
        }
    }

    /// A transcriber that always fails with the given HTTP status.
    pub fn status(code: u16) -> Self {
        Self { reply: Err(code) }
    }
}

#[cfg(test)]
#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(
        &self,
        _audio: &AudioTrack,
        _question: &str,
    ) -> Result<String, ServiceError> {
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(code) => Err(ServiceError::Status(*code)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
