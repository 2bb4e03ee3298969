//! Pipeline orchestrator — drives the full capture → transcode → transcribe
//! → feedback → aggregate loop.
//!
//! [`InterviewOrchestrator`] owns the [`Session`] and the
//! [`CaptureController`] and responds to [`SessionCommand`]s received over a
//! `tokio::sync::mpsc` channel.
//!
//! # Pipeline flow
//!
//! ```text
//! SessionCommand::Submit
//!   └─▶ stop capture, join chunks into RecordedClip       [Processing]
//!         └─▶ Transcoder::extract_audio                    (ffmpeg)
//!               └─▶ Transcriber::transcribe                [Transcribing]
//!                     └─▶ FeedbackGenerator::generate      [Generating]
//!                           ├─ Ok  → append record, advance / complete
//!                           └─ Err → status Failed, recording kept intact
//! ```
//!
//! Commands are processed strictly one at a time, so the pipeline for
//! question N+1 can never start before question N's record is appended.
//! There is no cancellation of an in-flight submission and no automatic
//! retry anywhere — every retry is the user re-issuing `Submit`.

use std::collections::VecDeque;
use std::sync::{mpsc as std_mpsc, Arc};

use tokio::sync::mpsc;

use crate::capture::{CaptureController, CaptureError, CountdownStatus, MediaChunk};
use crate::services::{FeedbackGenerator, PromptBuilder, Transcriber};
use crate::session::{
    Effect, ResponseRecord, Session, SessionEvent, SessionSummary, Stage,
};
use crate::transcode::{RecordedClip, Transcoder};

use super::events::{SessionCommand, SessionUpdate, SubmitStatus};

// ---------------------------------------------------------------------------
// InterviewOrchestrator
// ---------------------------------------------------------------------------

/// Drives one complete interview session.
///
/// Create with [`InterviewOrchestrator::new`], then call
/// [`run`](Self::run) inside a tokio task. `run` returns the final
/// [`Session`] once the command channel closes, so the caller can render the
/// records and summary.
pub struct InterviewOrchestrator {
    session: Session,
    capture: CaptureController,
    /// Where the media source delivers its chunks; the driver pumps the
    /// receiving end back in as [`SessionCommand::Chunk`].
    chunk_tx: std_mpsc::Sender<MediaChunk>,
    transcoder: Arc<dyn Transcoder>,
    transcriber: Arc<dyn Transcriber>,
    generator: Arc<dyn FeedbackGenerator>,
    prompt_builder: PromptBuilder,
    update_tx: mpsc::Sender<SessionUpdate>,
    last_stage: Stage,
}

impl InterviewOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `session`    — a fresh [`Session`] over the question catalog.
    /// * `capture`    — the capture controller (owns the media source).
    /// * `chunk_tx`   — sender handed to the source on first capture.
    /// * `transcoder` — clip → audio collaborator (e.g. `FfmpegTranscoder`).
    /// * `transcriber`— audio → transcript collaborator.
    /// * `generator`  — prompt → text collaborator (streamed).
    /// * `update_tx`  — where progress updates are delivered.
    pub fn new(
        session: Session,
        capture: CaptureController,
        chunk_tx: std_mpsc::Sender<MediaChunk>,
        transcoder: Arc<dyn Transcoder>,
        transcriber: Arc<dyn Transcriber>,
        generator: Arc<dyn FeedbackGenerator>,
        update_tx: mpsc::Sender<SessionUpdate>,
    ) -> Self {
        let last_stage = session.stage();
        Self {
            session,
            capture,
            chunk_tx,
            transcoder,
            transcriber,
            generator,
            prompt_builder: PromptBuilder::new(),
            update_tx,
            last_stage,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the orchestrator until `command_rx` is closed; returns the final
    /// session state.
    ///
    /// This is an `async fn` and should be spawned as a tokio task.
    pub async fn run(mut self, mut command_rx: mpsc::Receiver<SessionCommand>) -> Session {
        self.emit(SessionUpdate::StageChanged {
            stage: self.session.stage(),
        })
        .await;

        while let Some(command) = command_rx.recv().await {
            match command {
                SessionCommand::ChooseCategory { index } => {
                    self.dispatch(SessionEvent::CategorySelected { index }).await;
                }
                SessionCommand::ChooseTopic { topic } => {
                    self.dispatch(SessionEvent::TopicSelected { topic }).await;
                }
                SessionCommand::ImportQuestions { prompts } => {
                    self.dispatch(SessionEvent::QuestionsImported { prompts })
                        .await;
                }
                SessionCommand::GoBack => {
                    self.dispatch(SessionEvent::Back).await;
                }
                SessionCommand::BeginCapture => {
                    self.handle_begin_capture().await;
                }
                SessionCommand::Chunk { chunk } => {
                    self.capture.on_chunk(chunk);
                }
                SessionCommand::Tick => {
                    self.handle_tick().await;
                }
                SessionCommand::EndCapture => {
                    self.capture.stop_capture();
                    self.emit(SessionUpdate::CaptureStopped).await;
                }
                SessionCommand::Submit => {
                    self.handle_submit().await;
                }
                SessionCommand::RestartAnswer => {
                    self.capture.restart();
                    self.emit(SessionUpdate::CountdownTick {
                        remaining: self.capture.remaining_secs(),
                        label: self.capture.countdown_label(),
                    })
                    .await;
                }
            }
        }

        log::info!("pipeline: command channel closed, orchestrator shutting down");
        self.session
    }

    // -----------------------------------------------------------------------
    // Event dispatch
    // -----------------------------------------------------------------------

    /// Apply a session event and perform every effect it (and follow-up
    /// events) request. Effects are worked off a queue rather than
    /// recursively, so chains like topic pick → generation → interview start
    /// stay a single linear pass.
    async fn dispatch(&mut self, event: SessionEvent) {
        let mut effects: VecDeque<Effect> = self.session.apply(event).into_iter().collect();
        self.sync_stage().await;

        while let Some(effect) = effects.pop_front() {
            match effect {
                Effect::GenerateQuestions { topic } => {
                    let prompt = self.prompt_builder.topic_questions(&topic);
                    match self.generator.generate(&prompt).await {
                        Ok(text) => {
                            let prompts: Vec<String> = text
                                .lines()
                                .map(str::trim)
                                .filter(|line| !line.is_empty())
                                .map(str::to_string)
                                .collect();
                            effects.extend(
                                self.session
                                    .apply(SessionEvent::QuestionsGenerated { prompts }),
                            );
                            self.sync_stage().await;
                        }
                        Err(e) => {
                            log::error!("pipeline: question generation failed: {e}");
                            self.emit(SessionUpdate::Error {
                                message: format!("question generation failed: {e}"),
                            })
                            .await;
                        }
                    }
                }

                Effect::ResetCapture => {
                    self.capture.restart();
                    if let Some(question) =
                        self.session.current_question().map(str::to_string)
                    {
                        self.emit(SessionUpdate::QuestionChanged {
                            index: self.session.current_index(),
                            question,
                        })
                        .await;
                    }
                }

                Effect::Summarize => {
                    let summary = self.build_summary().await;
                    self.emit(SessionUpdate::SummaryReady {
                        summary: summary.clone(),
                    })
                    .await;
                    effects.extend(self.session.apply(SessionEvent::SummaryReady { summary }));
                    self.sync_stage().await;
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    async fn handle_begin_capture(&mut self) {
        if self.session.stage() != Stage::Interviewing {
            log::debug!("pipeline: BeginCapture ignored outside the interview");
            return;
        }

        match self.capture.start_capture(&self.chunk_tx) {
            Ok(()) => {
                self.emit(SessionUpdate::CaptureStarted).await;
                self.emit(SessionUpdate::CountdownTick {
                    remaining: self.capture.remaining_secs(),
                    label: self.capture.countdown_label(),
                })
                .await;
            }
            Err(CaptureError::PermissionDenied(detail)) => {
                self.emit(SessionUpdate::CaptureUnavailable {
                    message: format!("recording permission denied: {detail}"),
                })
                .await;
                self.dispatch(SessionEvent::CaptureDenied).await;
            }
            Err(e) => {
                log::error!("pipeline: could not start capture: {e}");
                self.emit(SessionUpdate::Error {
                    message: format!("could not start capture: {e}"),
                })
                .await;
            }
        }
    }

    async fn handle_tick(&mut self) {
        match self.capture.tick() {
            CountdownStatus::Running { remaining } => {
                self.emit(SessionUpdate::CountdownTick {
                    remaining,
                    label: self.capture.countdown_label(),
                })
                .await;
            }
            CountdownStatus::Expired => {
                self.emit(SessionUpdate::CountdownTick {
                    remaining: 0,
                    label: self.capture.countdown_label(),
                })
                .await;
                self.emit(SessionUpdate::CaptureStopped).await;
            }
            CountdownStatus::Idle => {}
        }
    }

    /// Submit the captured answer: clip → audio → transcript → feedback →
    /// record. Any failure flags `Failed`, re-enables submit, and leaves the
    /// recording intact so the user can retry without re-recording.
    async fn handle_submit(&mut self) {
        if self.session.stage() != Stage::Interviewing {
            log::debug!("pipeline: Submit ignored outside the interview");
            return;
        }
        let Some(question) = self.session.current_question().map(str::to_string) else {
            log::debug!("pipeline: Submit with no current question");
            return;
        };

        // A submit while still recording stops the capture first.
        self.capture.stop_capture();

        if self.capture.recording().is_empty() {
            self.emit(SessionUpdate::Error {
                message: "nothing recorded yet".into(),
            })
            .await;
            return;
        }

        self.emit(SessionUpdate::Submission {
            status: SubmitStatus::Processing,
        })
        .await;

        let clip = RecordedClip::from_recording(self.capture.recording());
        log::info!(
            "pipeline: submitting clip {} ({} bytes) for question {}",
            clip.id,
            clip.data.len(),
            self.session.current_index() + 1
        );

        let audio = match self.transcoder.extract_audio(&clip).await {
            Ok(audio) => audio,
            Err(e) => {
                self.fail_submission(format!("audio extraction failed: {e}"))
                    .await;
                return;
            }
        };

        self.emit(SessionUpdate::Submission {
            status: SubmitStatus::Transcribing,
        })
        .await;

        let transcript = match self.transcriber.transcribe(&audio, &question).await {
            Ok(transcript) => transcript,
            Err(e) => {
                self.fail_submission(format!("transcription failed: {e}"))
                    .await;
                return;
            }
        };

        self.emit(SessionUpdate::Submission {
            status: SubmitStatus::Generating,
        })
        .await;

        let prompt = self.prompt_builder.answer_feedback(
            self.session.question_set().kind,
            &question,
            &transcript,
        );
        let feedback = match self.generator.generate(&prompt).await {
            Ok(feedback) => feedback,
            Err(e) => {
                self.fail_submission(format!("feedback generation failed: {e}"))
                    .await;
                return;
            }
        };

        self.emit(SessionUpdate::Submission {
            status: SubmitStatus::Done,
        })
        .await;

        let record = ResponseRecord {
            question,
            transcript,
            feedback,
        };
        self.emit(SessionUpdate::RecordAppended {
            record: record.clone(),
        })
        .await;

        self.dispatch(SessionEvent::AnswerSubmitted { record }).await;
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn fail_submission(&self, message: String) {
        log::error!("pipeline: {message}");
        self.emit(SessionUpdate::Submission {
            status: SubmitStatus::Failed,
        })
        .await;
        self.emit(SessionUpdate::Error { message }).await;
    }

    /// Run the aggregation step over all records.
    ///
    /// A generation failure degrades to an empty narrative with score 0 —
    /// the same defaulting the score scrape applies to an unparseable
    /// narrative — so the session still terminates in `Completed`.
    async fn build_summary(&self) -> SessionSummary {
        let prompt = self.prompt_builder.overall_summary(self.session.records());
        match self.generator.generate(&prompt).await {
            Ok(text) => SessionSummary::from_generated(&text),
            Err(e) => {
                log::error!("pipeline: summary generation failed: {e}");
                self.emit(SessionUpdate::Error {
                    message: format!("summary generation failed: {e}"),
                })
                .await;
                SessionSummary {
                    feedback: String::new(),
                    score: 0,
                }
            }
        }
    }

    async fn sync_stage(&mut self) {
        let stage = self.session.stage();
        if stage != self.last_stage {
            self.last_stage = stage;
            log::info!("pipeline: stage → {}", stage.label());
            self.emit(SessionUpdate::StageChanged { stage }).await;
        }
    }

    async fn emit(&self, update: SessionUpdate) {
        // Ignore send errors; the receiver may have been dropped.
        let _ = self.update_tx.send(update).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MockSource;
    use crate::services::{MockGenerator, MockTranscriber, ServiceError};
    use crate::session::built_in_catalog;
    use crate::transcode::MockTranscoder;

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    struct Harness {
        command_tx: mpsc::Sender<SessionCommand>,
        update_rx: mpsc::Receiver<SessionUpdate>,
        generator: Arc<MockGenerator>,
        // Keeps the chunk channel open for the session's lifetime.
        _chunk_rx: std_mpsc::Receiver<MediaChunk>,
        task: tokio::task::JoinHandle<Session>,
    }

    fn spawn_orchestrator(transcriber: MockTranscriber, answer_secs: u32) -> Harness {
        let (chunk_tx, chunk_rx) = std_mpsc::channel();
        let (command_tx, command_rx) = mpsc::channel(64);
        let (update_tx, update_rx) = mpsc::channel(256);

        let generator = Arc::new(MockGenerator::new());
        let capture = CaptureController::new(Box::new(MockSource::ok()), answer_secs);

        let orchestrator = InterviewOrchestrator::new(
            Session::new(built_in_catalog()),
            capture,
            chunk_tx,
            Arc::new(MockTranscoder::ok()),
            Arc::new(transcriber),
            Arc::clone(&generator) as Arc<dyn FeedbackGenerator>,
            update_tx,
        );

        let task = tokio::spawn(orchestrator.run(command_rx));

        Harness {
            command_tx,
            update_rx,
            generator,
            _chunk_rx: chunk_rx,
            task,
        }
    }

    async fn answer_current_question(harness: &Harness) {
        let tx = &harness.command_tx;
        tx.send(SessionCommand::BeginCapture).await.unwrap();
        tx.send(SessionCommand::Chunk {
            chunk: MediaChunk {
                data: vec![1, 2, 3],
            },
        })
        .await
        .unwrap();
        tx.send(SessionCommand::EndCapture).await.unwrap();
        tx.send(SessionCommand::Submit).await.unwrap();
    }

    fn drain(mut rx: mpsc::Receiver<SessionUpdate>) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = rx.try_recv() {
            updates.push(update);
        }
        updates
    }

    // -----------------------------------------------------------------------
    // End-to-end
    // -----------------------------------------------------------------------

    /// Two imported questions, both answered: the record sequence reaches
    /// length 2 and the session transitions to `Completed` without manual
    /// intervention.
    #[tokio::test]
    async fn two_question_session_completes() {
        let harness = spawn_orchestrator(MockTranscriber::ok("my answer"), 150);
        harness.generator.push_ok("feedback one");
        harness.generator.push_ok("feedback two");
        harness.generator.push_ok("Strong overall.\nScore: 7/10");

        harness
            .command_tx
            .send(SessionCommand::ImportQuestions {
                prompts: vec!["Q1".into(), "Q2".into()],
            })
            .await
            .unwrap();

        answer_current_question(&harness).await;
        answer_current_question(&harness).await;

        drop(harness.command_tx);
        let session = harness.task.await.expect("orchestrator");

        assert_eq!(session.stage(), Stage::Completed);
        assert_eq!(session.records().len(), 2);
        assert_eq!(session.records()[0].question, "Q1");
        assert_eq!(session.records()[0].feedback, "feedback one");
        assert_eq!(session.records()[1].question, "Q2");
        assert_eq!(session.summary().map(|s| s.score), Some(7));

        let updates = drain(harness.update_rx);
        let appended = updates
            .iter()
            .filter(|u| matches!(u, SessionUpdate::RecordAppended { .. }))
            .count();
        assert_eq!(appended, 2);
        assert!(updates
            .iter()
            .any(|u| matches!(u, SessionUpdate::SummaryReady { .. })));
    }

    /// A transcription `{error}` payload flows into the feedback prompt as
    /// the transcript value; it is never raised as a fault.
    #[tokio::test]
    async fn moderation_error_is_used_as_transcript() {
        let harness = spawn_orchestrator(
            MockTranscriber::ok("Inappropriate content detected. Please try again."),
            150,
        );
        harness.generator.push_ok("feedback");
        harness.generator.push_ok("Score: 1/10");

        harness
            .command_tx
            .send(SessionCommand::ImportQuestions {
                prompts: vec!["Q1".into()],
            })
            .await
            .unwrap();
        answer_current_question(&harness).await;

        drop(harness.command_tx);
        let session = harness.task.await.expect("orchestrator");

        assert_eq!(session.stage(), Stage::Completed);
        assert_eq!(
            session.records()[0].transcript,
            "Inappropriate content detected. Please try again."
        );
        // The feedback prompt embedded the surfaced error text.
        let prompts = harness.generator.prompts();
        assert!(prompts[0].contains("Inappropriate content detected."));
    }

    /// A failed submission flags `Failed`, keeps the recording intact, and a
    /// user-initiated retry completes without re-recording.
    #[tokio::test]
    async fn failed_submission_allows_retry_without_rerecording() {
        let harness = spawn_orchestrator(MockTranscriber::ok("answer"), 150);
        harness.generator.push_err(ServiceError::Status(502));
        harness.generator.push_ok("feedback after retry");
        harness.generator.push_ok("Score: 5/10");

        harness
            .command_tx
            .send(SessionCommand::ImportQuestions {
                prompts: vec!["Q1".into()],
            })
            .await
            .unwrap();
        answer_current_question(&harness).await;

        // Retry: just submit again — no capture commands.
        harness.command_tx.send(SessionCommand::Submit).await.unwrap();

        drop(harness.command_tx);
        let session = harness.task.await.expect("orchestrator");

        assert_eq!(session.stage(), Stage::Completed);
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.records()[0].feedback, "feedback after retry");

        let updates = drain(harness.update_rx);
        assert!(updates.iter().any(|u| matches!(
            u,
            SessionUpdate::Submission {
                status: SubmitStatus::Failed
            }
        )));
    }

    /// A hard transcription failure (non-2xx) aborts the submission.
    #[tokio::test]
    async fn transcription_hard_failure_flags_failed() {
        let harness = spawn_orchestrator(MockTranscriber::status(500), 150);

        harness
            .command_tx
            .send(SessionCommand::ImportQuestions {
                prompts: vec!["Q1".into()],
            })
            .await
            .unwrap();
        answer_current_question(&harness).await;

        drop(harness.command_tx);
        let session = harness.task.await.expect("orchestrator");

        assert_eq!(session.stage(), Stage::Interviewing);
        assert!(session.records().is_empty());

        let updates = drain(harness.update_rx);
        assert!(updates.iter().any(|u| matches!(
            u,
            SessionUpdate::Submission {
                status: SubmitStatus::Failed
            }
        )));
    }

    // -----------------------------------------------------------------------
    // Countdown
    // -----------------------------------------------------------------------

    /// Countdown expiry stops the capture; the buffered answer survives and
    /// can be submitted.
    #[tokio::test]
    async fn countdown_expiry_stops_capture() {
        let harness = spawn_orchestrator(MockTranscriber::ok("answer"), 2);
        harness.generator.push_ok("feedback");
        harness.generator.push_ok("Score: 4/10");

        let tx = &harness.command_tx;
        tx.send(SessionCommand::ImportQuestions {
            prompts: vec!["Q1".into()],
        })
        .await
        .unwrap();
        tx.send(SessionCommand::BeginCapture).await.unwrap();
        tx.send(SessionCommand::Chunk {
            chunk: MediaChunk { data: vec![1] },
        })
        .await
        .unwrap();
        tx.send(SessionCommand::Tick).await.unwrap();
        tx.send(SessionCommand::Tick).await.unwrap(); // expiry
        tx.send(SessionCommand::Submit).await.unwrap();

        drop(harness.command_tx);
        let session = harness.task.await.expect("orchestrator");

        assert_eq!(session.stage(), Stage::Completed);
        assert_eq!(session.records().len(), 1);

        let updates = drain(harness.update_rx);
        assert!(updates
            .iter()
            .any(|u| matches!(u, SessionUpdate::CaptureStopped)));
        assert!(updates.iter().any(|u| matches!(
            u,
            SessionUpdate::CountdownTick { remaining: 0, .. }
        )));
    }

    // -----------------------------------------------------------------------
    // Permission denial
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn denied_device_enters_permission_denied() {
        let (chunk_tx, _chunk_rx) = std_mpsc::channel();
        let (command_tx, command_rx) = mpsc::channel(64);
        let (update_tx, update_rx) = mpsc::channel(256);

        let generator = Arc::new(MockGenerator::new());
        let capture = CaptureController::new(Box::new(MockSource::denied()), 150);
        let orchestrator = InterviewOrchestrator::new(
            Session::new(built_in_catalog()),
            capture,
            chunk_tx,
            Arc::new(MockTranscoder::ok()),
            Arc::new(MockTranscriber::ok("answer")),
            generator as Arc<dyn FeedbackGenerator>,
            update_tx,
        );
        let task = tokio::spawn(orchestrator.run(command_rx));

        command_tx
            .send(SessionCommand::ImportQuestions {
                prompts: vec!["Q1".into()],
            })
            .await
            .unwrap();
        command_tx.send(SessionCommand::BeginCapture).await.unwrap();

        drop(command_tx);
        let session = task.await.expect("orchestrator");

        assert_eq!(session.stage(), Stage::PermissionDenied);

        let updates = drain(update_rx);
        assert!(updates
            .iter()
            .any(|u| matches!(u, SessionUpdate::CaptureUnavailable { .. })));
    }

    // -----------------------------------------------------------------------
    // Topic-driven generation
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn topic_pick_generates_prompts_and_starts_interview() {
        let harness = spawn_orchestrator(MockTranscriber::ok("answer"), 150);
        harness
            .generator
            .push_ok("What is a B-tree?\nExplain deadlock.\n");

        let tx = &harness.command_tx;
        tx.send(SessionCommand::ChooseCategory { index: 1 })
            .await
            .unwrap();
        tx.send(SessionCommand::ChooseTopic {
            topic: crate::session::Topic::new(1, "DSA"),
        })
        .await
        .unwrap();

        drop(harness.command_tx);
        let session = harness.task.await.expect("orchestrator");

        assert_eq!(session.stage(), Stage::Interviewing);
        assert_eq!(session.question_set().prompt_count(), 2);
        assert_eq!(session.current_question(), Some("What is a B-tree?"));

        // The generation prompt was seeded with the topic name.
        assert!(harness.generator.prompts()[0].contains("the topic: DSA"));
    }

    /// Submitting before anything is recorded is a surfaced error, not a
    /// crash, and does not consume the question.
    #[tokio::test]
    async fn submit_without_recording_is_surfaced() {
        let harness = spawn_orchestrator(MockTranscriber::ok("answer"), 150);

        harness
            .command_tx
            .send(SessionCommand::ImportQuestions {
                prompts: vec!["Q1".into()],
            })
            .await
            .unwrap();
        harness.command_tx.send(SessionCommand::Submit).await.unwrap();

        drop(harness.command_tx);
        let session = harness.task.await.expect("orchestrator");

        assert_eq!(session.stage(), Stage::Interviewing);
        assert!(session.records().is_empty());

        let updates = drain(harness.update_rx);
        assert!(updates
            .iter()
            .any(|u| matches!(u, SessionUpdate::Error { .. })));
    }
}
