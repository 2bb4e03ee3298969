//! Media sources — where answer chunks come from.
//!
//! [`MediaSource`] abstracts the recording device. Call
//! [`MediaSource::open`] to begin streaming [`MediaChunk`]s over an mpsc
//! channel. The returned [`StreamHandle`] is a RAII guard — dropping it
//! signals the producer thread to stop.
//!
//! [`FileSource`] is the production implementation: it streams a
//! pre-recorded media file in fixed-size chunks on a dedicated thread,
//! standing in for a live camera/microphone recorder.

use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use thiserror::Error;

// ---------------------------------------------------------------------------
// MediaChunk
// ---------------------------------------------------------------------------

/// A single buffer of recorded media as delivered by the source.
#[derive(Debug, Clone)]
pub struct MediaChunk {
    /// Raw container bytes (e.g. a WebM fragment).
    pub data: Vec<u8>,
}

impl MediaChunk {
    /// Returns `true` when the chunk carries no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while acquiring or running a media source.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Access to the recording device was denied. Terminal for the session;
    /// the only way out is navigating back.
    #[error("recording permission denied: {0}")]
    PermissionDenied(String),

    /// The source could not be opened for a non-permission reason.
    #[error("failed to open media source: {0}")]
    Open(String),
}

// ---------------------------------------------------------------------------
// StreamHandle
// ---------------------------------------------------------------------------

/// RAII guard that keeps the source's producer alive.
///
/// Dropping this value raises a stop flag; the producer thread notices it on
/// its next iteration and exits.
#[derive(Debug)]
pub struct StreamHandle {
    stop: Arc<AtomicBool>,
}

impl StreamHandle {
    /// Create a handle around a shared stop flag.
    pub fn new(stop: Arc<AtomicBool>) -> Self {
        Self { stop }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// MediaSource
// ---------------------------------------------------------------------------

/// A device that produces recorded media chunks.
///
/// Implementors must be `Send` so the controller can live inside a tokio
/// task. The stream is expected to stay open for the whole session — the
/// controller acquires it once and keeps the handle across questions, so the
/// candidate is never re-prompted for device access.
pub trait MediaSource: Send + Sync {
    /// Start producing chunks into `tx`.
    ///
    /// Send errors (receiver dropped) must be swallowed by the producer so
    /// it never panics.
    fn open(&mut self, tx: mpsc::Sender<MediaChunk>) -> Result<StreamHandle, CaptureError>;
}

// ---------------------------------------------------------------------------
// FileSource
// ---------------------------------------------------------------------------

/// Streams a pre-recorded media file in fixed-size chunks.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::mpsc;
/// use interview_coach::capture::{FileSource, MediaChunk, MediaSource};
///
/// let (tx, rx) = mpsc::channel::<MediaChunk>();
/// let mut source = FileSource::new("answers/q1.webm", 64 * 1024);
/// let _handle = source.open(tx).unwrap(); // drop handle → producer stops
///
/// while let Ok(chunk) = rx.recv() {
///     println!("received {} bytes", chunk.data.len());
/// }
/// ```
pub struct FileSource {
    path: PathBuf,
    chunk_bytes: usize,
}

impl FileSource {
    /// Create a source over `path`, emitting chunks of `chunk_bytes` bytes.
    pub fn new(path: impl Into<PathBuf>, chunk_bytes: usize) -> Self {
        Self {
            path: path.into(),
            chunk_bytes: chunk_bytes.max(1),
        }
    }
}

impl MediaSource for FileSource {
    /// Open the file and spawn a producer thread that reads it to the end.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::PermissionDenied`] when the OS refuses access
    /// to the file (the headless analogue of a denied camera prompt), or
    /// [`CaptureError::Open`] for any other I/O failure.
    fn open(&mut self, tx: mpsc::Sender<MediaChunk>) -> Result<StreamHandle, CaptureError> {
        let mut file = std::fs::File::open(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                CaptureError::PermissionDenied(self.path.display().to_string())
            } else {
                CaptureError::Open(format!("{}: {e}", self.path.display()))
            }
        })?;

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let chunk_bytes = self.chunk_bytes;

        std::thread::spawn(move || {
            let mut buf = vec![0u8; chunk_bytes];
            loop {
                if thread_stop.load(Ordering::Relaxed) {
                    break;
                }
                match file.read(&mut buf) {
                    Ok(0) => break, // end of file — recorder went quiet
                    Ok(n) => {
                        let chunk = MediaChunk {
                            data: buf[..n].to_vec(),
                        };
                        // Ignore send errors; the receiver may have been dropped.
                        if tx.send(chunk).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        log::error!("media source read error: {e}");
                        break;
                    }
                }
            }
        });

        Ok(StreamHandle::new(stop))
    }
}

// ---------------------------------------------------------------------------
// MockSource  (test-only)
// ---------------------------------------------------------------------------

/// A test double that either opens successfully without producing any chunks,
/// or fails with a configurable error.
///
/// Chunks are fed to the controller directly in tests, so the mock never
/// spawns a producer thread.
#[cfg(test)]
pub struct MockSource {
    denied: bool,
    /// How many times `open` has been called — lets tests assert the stream
    /// is acquired exactly once per session.
    pub opens: Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl MockSource {
    /// A source that always opens.
    pub fn ok() -> Self {
        Self {
            denied: false,
            opens: Arc::new(std::sync::atomic::AtomicUsize::new(0)),
        }
    }

    /// A source that always reports a denied permission prompt.
    pub fn denied() -> Self {
        Self {
            denied: true,
            opens: Arc::new(std::sync::atomic::AtomicUsize::new(0)),
        }
    }
}

#[cfg(test)]
impl MediaSource for MockSource {
    fn open(&mut self, _tx: mpsc::Sender<MediaChunk>) -> Result<StreamHandle, CaptureError> {
        self.opens.fetch_add(1, Ordering::Relaxed);
        if self.denied {
            Err(CaptureError::PermissionDenied("mock device".into()))
        } else {
            Ok(StreamHandle::new(Arc::new(AtomicBool::new(false))))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
