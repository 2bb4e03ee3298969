//! Clip assembly and audio extraction.
//!
//! This module provides:
//! * [`RecordedClip`] — one capture's chunks joined and uuid-tagged.
//! * [`AudioTrack`] — mono 16 kHz MP3 ready for upload.
//! * [`Transcoder`] — async trait for clip → audio extraction.
//! * [`FfmpegTranscoder`] — production implementation over an external
//!   `ffmpeg` process.
//! * [`TranscodeError`] — error variants for the extraction step.

pub mod clip;
pub mod ffmpeg;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use clip::{AudioTrack, RecordedClip};
pub use ffmpeg::{FfmpegTranscoder, TranscodeError, Transcoder};

#[cfg(test)]
pub use ffmpeg::MockTranscoder;
