//! Finalized clips and extracted audio tracks.
//!
//! A [`RecordedClip`] is the immutable product of one capture interval: the
//! recording's chunks joined into a single media object, tagged with a
//! collision-resistant identifier so repeated submissions within one session
//! never clash on intermediate file names.

use uuid::Uuid;

use crate::capture::Recording;

// ---------------------------------------------------------------------------
// RecordedClip
// ---------------------------------------------------------------------------

/// One answer's recorded media, joined and tagged for submission.
#[derive(Debug, Clone)]
pub struct RecordedClip {
    /// Unique per-submission identifier (UUID v4).
    pub id: Uuid,
    /// Raw container bytes (browser-recordable video, typically WebM).
    pub data: Vec<u8>,
}

impl RecordedClip {
    /// Join `recording`'s chunks into a clip with a fresh identifier.
    pub fn from_recording(recording: &Recording) -> Self {
        Self {
            id: Uuid::new_v4(),
            data: recording.concat(),
        }
    }

    /// Intermediate file name for the raw clip.
    pub fn file_name(&self) -> String {
        format!("{}.webm", self.id)
    }

    /// Returns `true` when the clip carries no media.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ---------------------------------------------------------------------------
// AudioTrack
// ---------------------------------------------------------------------------

/// Compact mono 16 kHz audio extracted from a [`RecordedClip`], ready for
/// upload to the transcription service.
#[derive(Debug, Clone)]
pub struct AudioTrack {
    /// Identifier inherited from the source clip.
    pub id: Uuid,
    /// Encoded audio bytes (MP3).
    pub data: Vec<u8>,
}

impl AudioTrack {
    /// Upload file name for the audio track.
    pub fn file_name(&self) -> String {
        format!("{}.mp3", self.id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
