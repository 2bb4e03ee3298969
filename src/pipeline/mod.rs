//! Pipeline orchestrator module for the interview engine.
//!
//! This module wires the capture → transcode → transcribe → feedback →
//! aggregate flow around the session state machine.
//!
//! # Architecture
//!
//! ```text
//! SessionCommand (mpsc)
//!        │
//!        ▼
//! InterviewOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ BeginCapture / Chunk / Tick / EndCapture → CaptureController
//!        │
//!        └─ Submit
//!              ├─ RecordedClip (uuid-tagged)
//!              ├─ Transcoder::extract_audio       [Processing]
//!              ├─ Transcriber::transcribe         [Transcribing]
//!              ├─ FeedbackGenerator::generate     [Generating]
//!              └─ Session::apply(AnswerSubmitted) → advance / Completed
//!                                                    └─ Effect::Summarize
//!
//! SessionUpdate (mpsc) ──▶ caller
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::{mpsc as std_mpsc, Arc};
//! use tokio::sync::mpsc;
//! use interview_coach::capture::{CaptureController, FileSource};
//! use interview_coach::config::AppConfig;
//! use interview_coach::pipeline::{InterviewOrchestrator, SessionCommand};
//! use interview_coach::services::{HttpGenerator, HttpTranscriber};
//! use interview_coach::session::{built_in_catalog, Session};
//! use interview_coach::transcode::FfmpegTranscoder;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let source = FileSource::new("answers/q1.webm", config.capture.chunk_bytes);
//!     let capture = CaptureController::new(Box::new(source), config.capture.answer_secs);
//!
//!     let (chunk_tx, _chunk_rx) = std_mpsc::channel();
//!     let (command_tx, command_rx) = mpsc::channel(16);
//!     let (update_tx, _update_rx) = mpsc::channel(64);
//!
//!     let orchestrator = InterviewOrchestrator::new(
//!         Session::new(built_in_catalog()),
//!         capture,
//!         chunk_tx,
//!         Arc::new(FfmpegTranscoder::from_config(&config.transcode)),
//!         Arc::new(HttpTranscriber::from_config(&config.services)),
//!         Arc::new(HttpGenerator::from_config(&config.services)),
//!         update_tx,
//!     );
//!
//!     let session = tokio::spawn(orchestrator.run(command_rx));
//!
//!     command_tx
//!         .send(SessionCommand::ImportQuestions {
//!             prompts: vec!["Tell me about yourself.".into()],
//!         })
//!         .await
//!         .unwrap();
//!     // … drive the interview, then drop command_tx and await `session`.
//! }
//! ```

pub mod events;
pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use events::{SessionCommand, SessionUpdate, SubmitStatus};
pub use runner::InterviewOrchestrator;
