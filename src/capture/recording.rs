//! Chunk buffer for one answer recording.
//!
//! A [`Recording`] accumulates the binary media chunks delivered while a
//! capture is active. Once finalized the buffer is immutable until
//! [`reset`](Recording::reset) — late chunks from the source are dropped, so
//! a submitted answer can never be mutated mid-upload.
//!
//! # Example
//!
//! ```rust
//! use interview_coach::capture::Recording;
//!
//! let mut rec = Recording::new();
//! rec.push_chunk(vec![1, 2, 3]);
//! rec.push_chunk(Vec::new()); // empty chunks are ignored
//! rec.finalize();
//! rec.push_chunk(vec![4]);    // ignored — buffer is finalized
//! assert_eq!(rec.concat(), vec![1, 2, 3]);
//! ```

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// Ordered sequence of media chunks for a single answer.
///
/// ## Lifecycle
///
/// ```text
/// new ──push_chunk*──▶ open ──finalize──▶ finalized ──reset──▶ open (empty)
/// ```
///
/// `finalize` is idempotent; finalizing twice leaves the buffer exactly as
/// finalizing once did.
#[derive(Debug, Default)]
pub struct Recording {
    chunks: Vec<Vec<u8>>,
    finalized: bool,
}

impl Recording {
    /// Create an empty, open recording buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk.
    ///
    /// Empty chunks are dropped (the media recorder occasionally emits
    /// zero-length buffers), and chunks arriving after
    /// [`finalize`](Self::finalize) are dropped too.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        if self.finalized || chunk.is_empty() {
            return;
        }
        self.chunks.push(chunk);
    }

    /// Seal the buffer. Idempotent — a second call changes nothing.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// Returns `true` once [`finalize`](Self::finalize) has been called and
    /// [`reset`](Self::reset) has not.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Discard all chunks and reopen the buffer for a new answer.
    pub fn reset(&mut self) {
        self.chunks.clear();
        self.finalized = false;
    }

    /// Concatenate all chunks into one contiguous byte vector.
    pub fn concat(&self) -> Vec<u8> {
        let total: usize = self.chunks.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(total);
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out
    }

    /// Number of chunks currently buffered.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total bytes currently buffered.
    pub fn byte_len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Returns `true` when no chunks have been buffered.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
