//! Core `Transcoder` trait and `FfmpegTranscoder` implementation.
//!
//! The codec engine is an external collaborator: `FfmpegTranscoder` shells
//! out to an `ffmpeg` binary resolved from config (or `PATH`) and speaks to
//! it through intermediate files in a scratch directory. The contract is the
//! one the rest of the pipeline depends on: input = arbitrary
//! browser-recordable video container, output = mono 16 kHz MP3 small enough
//! to upload.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TranscodeConfig;
use crate::transcode::clip::{AudioTrack, RecordedClip};

// ---------------------------------------------------------------------------
// TranscodeError
// ---------------------------------------------------------------------------

/// Errors that can occur during audio extraction.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The clip had no media — the candidate submitted without recording.
    #[error("recorded clip is empty")]
    EmptyClip,

    /// The `ffmpeg` binary could not be found at the configured path.
    #[error("ffmpeg not found at {0}")]
    FfmpegNotFound(PathBuf),

    /// `ffmpeg` ran but exited with a failure status.
    #[error("ffmpeg failed: {0}")]
    Ffmpeg(String),

    /// Reading/writing intermediate files failed.
    #[error("transcode I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Transcoder trait
// ---------------------------------------------------------------------------

/// Async trait for clip → audio extraction.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn Transcoder>`).
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Extract a mono 16 kHz audio track from `clip`.
    async fn extract_audio(&self, clip: &RecordedClip) -> Result<AudioTrack, TranscodeError>;
}

// ---------------------------------------------------------------------------
// FfmpegTranscoder
// ---------------------------------------------------------------------------

/// Drives an external `ffmpeg` process: writes `<uuid>.webm` into the work
/// directory, runs the extraction, reads back `<uuid>.mp3`, and removes both
/// intermediates.
pub struct FfmpegTranscoder {
    binary: PathBuf,
    work_dir: PathBuf,
}

impl FfmpegTranscoder {
    /// Build a transcoder from application config.
    ///
    /// `ffmpeg_path = None` resolves to plain `ffmpeg` (looked up on `PATH`
    /// at spawn time); `work_dir = None` uses the system temp directory.
    pub fn from_config(config: &TranscodeConfig) -> Self {
        Self {
            binary: config
                .ffmpeg_path
                .clone()
                .unwrap_or_else(|| PathBuf::from("ffmpeg")),
            work_dir: config.work_dir.clone().unwrap_or_else(std::env::temp_dir),
        }
    }

    /// The resolved `ffmpeg` binary path.
    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    async fn cleanup(&self, paths: &[PathBuf]) {
        for path in paths {
            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("transcode: failed to remove {}: {e}", path.display());
                }
            }
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    /// Run `ffmpeg -i <clip> -vn -acodec libmp3lame -ac 1 -ar 16000 -f mp3`.
    async fn extract_audio(&self, clip: &RecordedClip) -> Result<AudioTrack, TranscodeError> {
        if clip.is_empty() {
            return Err(TranscodeError::EmptyClip);
        }

        tokio::fs::create_dir_all(&self.work_dir).await?;
        let input = self.work_dir.join(clip.file_name());
        let output = self.work_dir.join(format!("{}.mp3", clip.id));

        tokio::fs::write(&input, &clip.data).await?;

        let run = tokio::process::Command::new(&self.binary)
            .arg("-y")
            .arg("-i")
            .arg(&input)
            .args(["-vn", "-acodec", "libmp3lame", "-ac", "1", "-ar", "16000", "-f", "mp3"])
            .arg(&output)
            .output()
            .await;

        let out = match run {
            Ok(out) => out,
            Err(e) => {
                self.cleanup(&[input]).await;
                return if e.kind() == std::io::ErrorKind::NotFound {
                    Err(TranscodeError::FfmpegNotFound(self.binary.clone()))
                } else {
                    Err(TranscodeError::Io(e))
                };
            }
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            // The tail of ffmpeg's stderr carries the actual error line.
            let tail: String = stderr
                .lines()
                .rev()
                .take(3)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join(" | ");
            self.cleanup(&[input, output]).await;
            return Err(TranscodeError::Ffmpeg(tail));
        }

        let data = tokio::fs::read(&output).await?;
        self.cleanup(&[input, output]).await;

        log::debug!(
            "transcode: clip {} → {} audio bytes",
            clip.id,
            data.len()
        );
        Ok(AudioTrack { id: clip.id, data })
    }
}

// ---------------------------------------------------------------------------
// MockTranscoder  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns pre-configured audio without touching ffmpeg.
#[cfg(test)]
pub struct MockTranscoder {
    fail: bool,
}

#[cfg(test)]
impl MockTranscoder {
    /// A transcoder that echoes the clip bytes back as "audio".
    pub fn ok() -> Self {
        Self { fail: false }
    }

    /// A transcoder that always fails.
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[cfg(test)]
#[async_trait]
impl Transcoder for MockTranscoder {
    async fn extract_audio(&self, clip: &RecordedClip) -> Result<AudioTrack, TranscodeError> {
        if self.fail {
            return Err(TranscodeError::Ffmpeg("mock failure".into()));
        }
        Ok(AudioTrack {
            id: clip.id,
            data: clip.data.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Recording;

    fn clip(data: &[u8]) -> RecordedClip {
        let mut rec = Recording::new();
        rec.push_chunk(data.to_vec());
        rec.finalize();
        RecordedClip::from_recording(&rec)
    }

    #[test]
    fn from_config_defaults_to_path_lookup_and_temp_dir() {
        let transcoder = FfmpegTranscoder::from_config(&TranscodeConfig::default());
        assert_eq!(transcoder.binary(), &PathBuf::from("ffmpeg"));
        assert_eq!(transcoder.work_dir, std::env::temp_dir());
    }

    #[test]
    fn from_config_honours_explicit_paths() {
        let config = TranscodeConfig {
            ffmpeg_path: Some("/opt/ffmpeg/bin/ffmpeg".into()),
            work_dir: Some("/tmp/clips".into()),
        };
        let transcoder = FfmpegTranscoder::from_config(&config);
        assert_eq!(transcoder.binary(), &PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(transcoder.work_dir, PathBuf::from("/tmp/clips"));
    }

    #[tokio::test]
    async fn empty_clip_is_rejected_before_spawning() {
        let transcoder = FfmpegTranscoder::from_config(&TranscodeConfig::default());
        let empty = RecordedClip::from_recording(&Recording::new());

        match transcoder.extract_audio(&empty).await {
            Err(TranscodeError::EmptyClip) => {}
            other => panic!("expected EmptyClip, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_reports_ffmpeg_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = TranscodeConfig {
            ffmpeg_path: Some(dir.path().join("no-such-ffmpeg")),
            work_dir: Some(dir.path().to_path_buf()),
        };
        let transcoder = FfmpegTranscoder::from_config(&config);

        match transcoder.extract_audio(&clip(&[1, 2, 3])).await {
            Err(TranscodeError::FfmpegNotFound(path)) => {
                assert!(path.ends_with("no-such-ffmpeg"));
            }
            other => panic!("expected FfmpegNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mock_transcoder_round_trips_clip_bytes() {
        let transcoder = MockTranscoder::ok();
        let clip = clip(&[9, 8, 7]);

        let track = transcoder.extract_audio(&clip).await.expect("extract");
        assert_eq!(track.id, clip.id);
        assert_eq!(track.data, vec![9, 8, 7]);
        assert_eq!(track.file_name(), format!("{}.mp3", clip.id));
    }

    /// Verify that `FfmpegTranscoder` is object-safe (usable as
    /// `dyn Transcoder`).
    #[test]
    fn transcoder_is_object_safe() {
        let transcoder: Box<dyn Transcoder> =
            Box::new(FfmpegTranscoder::from_config(&TranscodeConfig::default()));
        drop(transcoder);
    }
}
