//! Resume intake — file validation, keyword extraction, and the two resume
//! collaborators.
//!
//! Two flows hang off an uploaded resume:
//! * **Interview from resume**: text extracted from the document (by the
//!   external extraction engine) is reduced to keywords, combined with a
//!   job description into a generation prompt, and the returned question
//!   block is filtered before being handed to the session as an import.
//! * **Resume analysis**: the document is uploaded as-is to the analysis
//!   collaborator, which answers `{feedback}` — a newline-delimited bullet
//!   list.
//!
//! Unsupported file formats are rejected *before* any network call, with a
//! message naming the supported formats.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ServicesConfig;
use crate::services::ServiceError;

// ---------------------------------------------------------------------------
// File-format gate
// ---------------------------------------------------------------------------

/// Resume formats accepted for upload, by extension (lower-case).
pub const SUPPORTED_FORMATS: &[&str] = &["pdf", "doc", "docx", "png", "jpg", "jpeg", "bmp"];

/// Errors from the resume intake flows.
#[derive(Debug, Error)]
pub enum ResumeError {
    /// The file extension is not one of [`SUPPORTED_FORMATS`]. Rejected
    /// before any network call; the message is user-facing.
    #[error("unsupported file format \"{extension}\" — please upload one of: pdf, doc, docx, png, jpg, jpeg, bmp")]
    Unsupported { extension: String },

    /// A collaborator call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Check a resume file name against the supported formats.
pub fn validate_resume_file(file_name: &str) -> Result<(), ResumeError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if SUPPORTED_FORMATS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(ResumeError::Unsupported { extension })
    }
}

// ---------------------------------------------------------------------------
// Keyword extraction
// ---------------------------------------------------------------------------

/// Reduce extracted resume text to its unique words of four letters or more,
/// in first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let Ok(word) = Regex::new(r"\b\w{4,}\b") else {
        return Vec::new();
    };

    let mut seen = std::collections::HashSet::new();
    word.find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Generated-question filtering
// ---------------------------------------------------------------------------

/// Topics dropped from generated question blocks (matched case-insensitively).
const DISALLOWED_TOPICS: &[&str] = &[
    "educational background",
    "schooling experience",
    "motivated you to pursue",
];

/// Turn a raw generated `{questions}` block into usable prompts.
///
/// Lines are trimmed and blanks dropped; the first remaining line is dropped
/// unconditionally (the collaborator tends to open with a preamble even when
/// told not to), and any line touching a disallowed topic is dropped.
pub fn filter_generated_questions(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip(1)
        .filter(|line| {
            let lower = line.to_lowercase();
            !DISALLOWED_TOPICS.iter().any(|topic| lower.contains(topic))
        })
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// QuestionGenerator
// ---------------------------------------------------------------------------

/// Async trait for the question-generation-from-keywords collaborator.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Submit `prompt`; returns the raw newline-delimited question block.
    async fn generate_questions(&self, prompt: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    questions: String,
}

/// Calls the configured question-generation endpoint with `{prompt}` JSON.
pub struct HttpQuestionGenerator {
    client: reqwest::Client,
    config: ServicesConfig,
}

impl HttpQuestionGenerator {
    /// Build an `HttpQuestionGenerator` from application config.
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
impl QuestionGenerator for HttpQuestionGenerator {
    async fn generate_questions(&self, prompt: &str) -> Result<String, ServiceError> {
        let mut req = self
            .client
            .post(self.config.questions_url())
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

        let body: QuestionsResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;
        Ok(body.questions)
    }
}

// ---------------------------------------------------------------------------
// Resume-to-interview flow
// ---------------------------------------------------------------------------

/// Produce filtered interview prompts from extracted resume text and a job
/// description.
pub async fn interview_questions_from_resume(
    resume_text: &str,
    job_description: &str,
    generator: &dyn QuestionGenerator,
) -> Result<Vec<String>, ResumeError> {
    let keywords = extract_keywords(resume_text);
    log::info!(
        "resume: {} keywords extracted for question generation",
        keywords.len()
    );

    let prompt =
        crate::services::PromptBuilder::new().resume_questions(&keywords, job_description);
    let raw = generator.generate_questions(&prompt).await?;

    let questions = filter_generated_questions(&raw);
    log::info!("resume: {} questions after filtering", questions.len());
    Ok(questions)
}

// ---------------------------------------------------------------------------
// ResumeAnalyzer
// ---------------------------------------------------------------------------

/// Async trait for the document-analysis collaborator.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    /// Upload the resume and return its feedback bullet points.
    async fn analyze(&self, file_name: &str, data: Vec<u8>) -> Result<Vec<String>, ResumeError>;
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    feedback: String,
}

/// Calls the configured resume-analysis endpoint with a multipart upload.
pub struct HttpResumeAnalyzer {
    client: reqwest::Client,
    config: ServicesConfig,
}

impl HttpResumeAnalyzer {
    /// Build an `HttpResumeAnalyzer` from application config.
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
impl ResumeAnalyzer for HttpResumeAnalyzer {
    /// Validate the file format, upload as `resume`, split the returned
    /// `{feedback}` into bullets.
    async fn analyze(&self, file_name: &str, data: Vec<u8>) -> Result<Vec<String>, ResumeError> {
        validate_resume_file(file_name)?;

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("resume", part);

        let mut req = self.client.post(self.config.resume_url()).multipart(form);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(ServiceError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()).into());
        }

        let body: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        Ok(body
            .feedback
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MockQuestionGenerator  (test-only)
// ---------------------------------------------------------------------------

/// A test double returning a fixed question block.
#[cfg(test)]
pub struct MockQuestionGenerator {
    block: String,
}

#[cfg(test)]
impl MockQuestionGenerator {
    pub fn with_block(block: &str) -> Self {
        Self {
            block: block.to_string(),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl QuestionGenerator for MockQuestionGenerator {
    async fn generate_questions(&self, _prompt: &str) -> Result<String, ServiceError> {
        Ok(self.block.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
