//! Commands into — and updates out of — the orchestrator.
//!
//! Every interaction with the engine is a discrete [`SessionCommand`]
//! delivered over a `tokio::sync::mpsc` channel and processed one at a time.
//! Progress flows back as [`SessionUpdate`]s; the caller renders them
//! however it likes (the bundled binary just logs and prints).

use crate::capture::MediaChunk;
use crate::session::{ResponseRecord, SessionSummary, Stage, Topic};

// ---------------------------------------------------------------------------
// SessionCommand
// ---------------------------------------------------------------------------

/// User/driver actions delivered to the orchestrator.
#[derive(Debug)]
pub enum SessionCommand {
    /// Pick a category from the catalog.
    ChooseCategory { index: usize },
    /// Pick a topic within the selected category; prompts are generated.
    ChooseTopic { topic: Topic },
    /// Hand off externally generated prompts (resume flow) — the topic pick
    /// is skipped.
    ImportQuestions { prompts: Vec<String> },
    /// Navigate back one wizard step.
    GoBack,
    /// Start capturing the current answer.
    BeginCapture,
    /// A media chunk arrived from the source.
    Chunk { chunk: MediaChunk },
    /// One second elapsed on the answer clock.
    Tick,
    /// Stop capturing the current answer.
    EndCapture,
    /// Submit the captured answer through the transcode/transcribe/feedback
    /// pipeline.
    Submit,
    /// Discard the captured answer and re-arm the countdown.
    RestartAnswer,
}

// ---------------------------------------------------------------------------
// SubmitStatus
// ---------------------------------------------------------------------------

/// Progress of one answer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Clip assembly and audio extraction are running.
    Processing,
    /// The audio upload is in flight.
    Transcribing,
    /// The feedback stream is being consumed.
    Generating,
    /// The submission failed; the recording is intact and submit is
    /// re-enabled for a user-initiated retry.
    Failed,
    /// The answer's record was appended.
    Done,
}

impl SubmitStatus {
    /// A short human-readable label suitable for display.
    pub fn label(&self) -> &'static str {
        match self {
            SubmitStatus::Processing => "Processing",
            SubmitStatus::Transcribing => "Transcribing",
            SubmitStatus::Generating => "Generating",
            SubmitStatus::Failed => "Failed",
            SubmitStatus::Done => "Done",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionUpdate
// ---------------------------------------------------------------------------

/// Progress events delivered from the orchestrator to the caller.
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// The wizard moved to a new stage.
    StageChanged { stage: Stage },
    /// The interview advanced to a new prompt.
    QuestionChanged { index: usize, question: String },
    /// Capture began for the current prompt.
    CaptureStarted,
    /// One second elapsed; `label` is the `MM:SS` display string.
    CountdownTick { remaining: u32, label: String },
    /// Capture stopped (explicitly or by countdown expiry).
    CaptureStopped,
    /// Submission progress for the current answer.
    Submission { status: SubmitStatus },
    /// One answer made it all the way through the pipeline.
    RecordAppended { record: ResponseRecord },
    /// The overall summary is ready.
    SummaryReady { summary: SessionSummary },
    /// Device access was denied; the interview flow is disabled.
    CaptureUnavailable { message: String },
    /// A non-fatal error the caller should surface.
    Error { message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
