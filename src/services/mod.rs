//! External collaborators — transcription, text generation, resume intake.
//!
//! This module provides:
//! * [`Transcriber`] / [`HttpTranscriber`] — multipart audio upload →
//!   transcript (a service-side `{error}` payload is surfaced *as* the
//!   transcript, never raised as a fault).
//! * [`FeedbackGenerator`] / [`HttpGenerator`] — `{prompt}` JSON → streamed
//!   text body, consumed to completion before use.
//! * [`QuestionGenerator`] / [`ResumeAnalyzer`] — the resume-intake
//!   collaborators, plus the keyword/filter plumbing around them.
//! * [`PromptBuilder`] — rubric-aware prompt construction.
//! * [`ServiceError`] — error variants shared by all HTTP collaborators.
//!
//! No collaborator retries on its own; every retry in the product is
//! user-initiated.

use thiserror::Error;

pub mod generate;
pub mod prompt;
pub mod resume;
pub mod transcribe;

// ---------------------------------------------------------------------------
// ServiceError
// ---------------------------------------------------------------------------

/// Errors shared by the HTTP collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("service request timed out")]
    Timeout,

    /// The service answered with a non-2xx status.
    #[error("service returned status {0}")]
    Status(u16),

    /// The response body could not be parsed as expected.
    #[error("failed to parse service response: {0}")]
    Parse(String),

    /// The streamed response carried no data at all.
    #[error("service returned an empty body")]
    EmptyBody,
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Timeout
        } else {
            ServiceError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use generate::{FeedbackGenerator, HttpGenerator};
pub use prompt::PromptBuilder;
pub use resume::{
    extract_keywords, filter_generated_questions, interview_questions_from_resume,
    validate_resume_file, HttpQuestionGenerator, HttpResumeAnalyzer, QuestionGenerator,
    ResumeAnalyzer, ResumeError, SUPPORTED_FORMATS,
};
pub use transcribe::{HttpTranscriber, Transcriber};

#[cfg(test)]
pub use generate::MockGenerator;
#[cfg(test)]
pub use resume::MockQuestionGenerator;
#[cfg(test)]
pub use transcribe::MockTranscriber;
