//! Answer capture — media source → chunk buffer → countdown.
//!
//! # Pipeline
//!
//! ```text
//! MediaSource → MediaChunk (mpsc) → CaptureController::on_chunk
//!            → Recording (per-answer buffer) ── finalize on stop/expiry
//! Countdown ticks (one event per second) ──▶ CaptureController::tick
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::mpsc;
//! use interview_coach::capture::{CaptureController, FileSource, MediaChunk};
//!
//! let (tx, rx) = mpsc::channel::<MediaChunk>();
//! let source = FileSource::new("answers/q1.webm", 64 * 1024);
//! let mut controller = CaptureController::new(Box::new(source), 150);
//!
//! controller.start_capture(&tx).unwrap();
//! while let Ok(chunk) = rx.try_recv() {
//!     controller.on_chunk(chunk);
//! }
//! controller.stop_capture();
//! println!("{} bytes recorded", controller.recording().byte_len());
//! ```

pub mod controller;
pub mod countdown;
pub mod recording;
pub mod source;

pub use controller::CaptureController;
pub use countdown::{Countdown, CountdownStatus};
pub use recording::Recording;
pub use source::{CaptureError, FileSource, MediaChunk, MediaSource, StreamHandle};

#[cfg(test)]
pub use source::MockSource;
