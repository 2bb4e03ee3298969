//! Capture controller — owns the media source, the chunk buffer and the
//! per-answer countdown.
//!
//! One controller lives for the whole interview session. The media stream is
//! acquired on the **first** [`start_capture`](CaptureController::start_capture)
//! and retained across questions — only the [`Recording`] buffer is reset
//! between answers, so the candidate is never re-prompted for device access.

use std::sync::mpsc;

use crate::capture::countdown::{Countdown, CountdownStatus};
use crate::capture::recording::Recording;
use crate::capture::source::{CaptureError, MediaChunk, MediaSource, StreamHandle};

// ---------------------------------------------------------------------------
// CaptureController
// ---------------------------------------------------------------------------

/// Drives one capture interval per interview question.
///
/// # Guarantees
///
/// * At most one capture is active at a time — `start_capture` while active
///   is a no-op.
/// * `stop_capture` is idempotent; after it returns, the buffer is immutable
///   until [`restart`](Self::restart).
/// * Countdown expiry stops the capture automatically.
pub struct CaptureController {
    source: Box<dyn MediaSource>,
    handle: Option<StreamHandle>,
    recording: Recording,
    countdown: Countdown,
    active: bool,
}

impl CaptureController {
    /// Create a controller over `source` with `answer_secs` per answer.
    pub fn new(source: Box<dyn MediaSource>, answer_secs: u32) -> Self {
        Self {
            source,
            handle: None,
            recording: Recording::new(),
            countdown: Countdown::new(answer_secs),
            active: false,
        }
    }

    /// Begin capturing the current answer.
    ///
    /// No-op when a capture is already active. The underlying stream is
    /// opened on the first call only; `tx` is where the source delivers its
    /// chunks (the orchestrator forwards them back in as events).
    ///
    /// # Errors
    ///
    /// Propagates [`CaptureError::PermissionDenied`] / [`CaptureError::Open`]
    /// from the source. A denied permission is terminal for the session.
    pub fn start_capture(
        &mut self,
        tx: &mpsc::Sender<MediaChunk>,
    ) -> Result<(), CaptureError> {
        if self.active {
            log::debug!("capture: start ignored — already active");
            return Ok(());
        }

        if self.handle.is_none() {
            self.handle = Some(self.source.open(tx.clone())?);
            log::info!("capture: media stream acquired");
        }

        self.countdown.arm();
        self.active = true;
        log::debug!("capture: started ({} on the clock)", self.countdown.label());
        Ok(())
    }

    /// Append a chunk delivered by the source.
    ///
    /// Chunks arriving while no capture is active are dropped; the buffer
    /// itself additionally drops empty chunks and anything after finalize.
    pub fn on_chunk(&mut self, chunk: MediaChunk) {
        if !self.active {
            return;
        }
        self.recording.push_chunk(chunk.data);
    }

    /// Advance the countdown by one second.
    ///
    /// Expiry stops the capture exactly as an explicit
    /// [`stop_capture`](Self::stop_capture) would.
    pub fn tick(&mut self) -> CountdownStatus {
        let status = self.countdown.tick();
        if status == CountdownStatus::Expired {
            log::info!("capture: countdown expired — stopping");
            self.stop_capture();
        }
        status
    }

    /// Stop the current capture and finalize the buffer.
    ///
    /// Idempotent — calling it with no capture active is a safe no-op, and
    /// calling it twice leaves the buffer exactly as one call did.
    pub fn stop_capture(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.countdown.halt();
        self.recording.finalize();
        log::debug!(
            "capture: stopped ({} chunks, {} bytes)",
            self.recording.chunk_count(),
            self.recording.byte_len()
        );
    }

    /// Clear the buffer and re-arm the countdown for the next answer.
    ///
    /// The media stream stays open; only per-answer state is reset.
    pub fn restart(&mut self) {
        self.active = false;
        self.recording.reset();
        self.countdown.reset();
        log::debug!("capture: reset for next answer");
    }

    /// The current answer's chunk buffer.
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Returns `true` while a capture is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `MM:SS` label for the remaining answer time.
    pub fn countdown_label(&self) -> String {
        self.countdown.label()
    }

    /// Seconds left on the answer clock.
    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
