//! Mock-interview session engine.
//!
//! Records a candidate's answer to an interview prompt as a stream of media
//! chunks, extracts a compact mono 16 kHz audio track, sends it to a
//! transcription service, asks a text-generation service for feedback, and
//! folds the per-question results into an overall score and narrative.
//!
//! # Architecture
//!
//! ```text
//! SessionCommand (mpsc)
//!        │
//!        ▼
//! InterviewOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ BeginCapture → CaptureController (MediaSource chunks, countdown)
//!        │
//!        └─ Submit
//!              │
//!              ├─ Recording → RecordedClip (uuid)
//!              ├─ Transcoder::extract_audio      (ffmpeg, mono 16 kHz mp3)
//!              ├─ Transcriber::transcribe        (multipart upload)
//!              ├─ FeedbackGenerator::generate    (streamed text, fully consumed)
//!              └─ Session::apply(AnswerSubmitted) → advance / Completed
//!
//! SessionUpdate (mpsc) ───▶ caller (stage changes, countdown, statuses)
//! ```

pub mod capture;
pub mod config;
pub mod pipeline;
pub mod services;
pub mod session;
pub mod transcode;
