//! Session state machine.
//!
//! [`Session`] is an explicit session object — no ambient globals. All
//! mutation goes through [`Session::apply`], a transition function over
//! discrete [`SessionEvent`]s that returns the side effects the caller must
//! perform ([`Effect`]). Events are processed one at a time by the
//! orchestrator, preserving the single-threaded ordering model.
//!
//! The stage machine is:
//!
//! ```text
//! SelectCategory ──CategorySelected──▶ SelectTopic
//! SelectTopic    ──TopicSelected─────▶ (Effect::GenerateQuestions)
//!                ──QuestionsGenerated▶ Interviewing
//! SelectCategory / SelectTopic
//!                ──QuestionsImported─▶ Interviewing   (topic pick skipped)
//! Interviewing   ──AnswerSubmitted──▶ Interviewing (next prompt)
//!                                   └▶ Completed    (last prompt answered)
//! Interviewing   ──CaptureDenied────▶ PermissionDenied  (terminal; Back only)
//! any non-terminal ──Back───────────▶ previous stage
//! ```

use crate::session::catalog::{QuestionSet, Topic};
use crate::session::report::{ResponseRecord, SessionSummary};

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Stages of one interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Picking a question category (behavioral / technical).
    SelectCategory,

    /// Picking a topic within the selected category.
    SelectTopic,

    /// Answering prompts one at a time.
    Interviewing,

    /// All prompts answered; the summary is (being) computed.
    Completed,

    /// Device access was denied. Terminal — only "go back" leaves it, with
    /// the interview flow disabled.
    PermissionDenied,
}

impl Stage {
    /// A short human-readable label suitable for display.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::SelectCategory => "Select a question type",
            Stage::SelectTopic => "Select a topic",
            Stage::Interviewing => "Interviewing",
            Stage::Completed => "Completed",
            Stage::PermissionDenied => "Permission denied",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionEvent / Effect
// ---------------------------------------------------------------------------

/// Discrete events delivered to the session, one at a time.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The candidate picked a category from the catalog.
    CategorySelected { index: usize },
    /// The candidate picked a topic within the selected category.
    TopicSelected { topic: Topic },
    /// The generation collaborator returned prompts for the chosen topic.
    QuestionsGenerated { prompts: Vec<String> },
    /// Prompts were handed off from the resume-intake flow; the topic pick
    /// is skipped entirely.
    QuestionsImported { prompts: Vec<String> },
    /// The candidate navigated back one step.
    Back,
    /// Device access was denied while entering the interview.
    CaptureDenied,
    /// One answer made it through the whole submit pipeline.
    AnswerSubmitted { record: ResponseRecord },
    /// The aggregation step produced the overall summary.
    SummaryReady { summary: SessionSummary },
}

/// Side-effect requests returned by [`Session::apply`]. The orchestrator
/// performs them; the session itself stays free of I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the generation collaborator for prompts on `topic`.
    GenerateQuestions { topic: String },
    /// Clear the capture buffer and re-arm the countdown for the next answer.
    ResetCapture,
    /// Run the aggregation step over all records.
    Summarize,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One interview session: wizard stage, selected question set, progress
/// through the prompts, and the per-question records.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Vec<QuestionSet>,
    stage: Stage,
    selected: QuestionSet,
    current_index: usize,
    records: Vec<ResponseRecord>,
    summary: Option<SessionSummary>,
}

impl Session {
    /// Start a fresh session over `catalog`.
    ///
    /// The first catalog entry is pre-selected, matching the category picker
    /// default.
    pub fn new(catalog: Vec<QuestionSet>) -> Self {
        let selected = catalog
            .first()
            .cloned()
            .unwrap_or_else(|| QuestionSet::imported(Vec::new()));
        Self {
            catalog,
            stage: Stage::SelectCategory,
            selected,
            current_index: 0,
            records: Vec::new(),
            summary: None,
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Apply one event; returns the side effects the caller must perform.
    ///
    /// Events that are invalid for the current stage are ignored (logged at
    /// debug), so a stale UI action can never corrupt the session.
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        match (self.stage, event) {
            (Stage::SelectCategory, SessionEvent::CategorySelected { index }) => {
                match self.catalog.get(index) {
                    Some(set) => {
                        self.selected = set.clone();
                        self.stage = Stage::SelectTopic;
                    }
                    None => log::debug!("session: category index {index} out of range"),
                }
                Vec::new()
            }

            (Stage::SelectTopic, SessionEvent::TopicSelected { topic }) => {
                log::info!("session: topic '{}' selected", topic.name);
                vec![Effect::GenerateQuestions { topic: topic.name }]
            }

            (Stage::SelectTopic, SessionEvent::QuestionsGenerated { prompts }) => {
                if prompts.is_empty() {
                    log::warn!("session: generation returned no prompts — staying on topic pick");
                    return Vec::new();
                }
                self.selected.replace_prompts(prompts);
                self.begin_interview()
            }

            (
                Stage::SelectCategory | Stage::SelectTopic,
                SessionEvent::QuestionsImported { prompts },
            ) => {
                if prompts.is_empty() {
                    log::warn!("session: import contained no prompts — ignoring");
                    return Vec::new();
                }
                self.selected = QuestionSet::imported(prompts);
                self.begin_interview()
            }

            (Stage::SelectTopic, SessionEvent::Back) => {
                self.stage = Stage::SelectCategory;
                Vec::new()
            }

            (Stage::Interviewing, SessionEvent::Back) => {
                self.stage = Stage::SelectTopic;
                Vec::new()
            }

            (Stage::PermissionDenied, SessionEvent::Back) => {
                self.stage = Stage::SelectCategory;
                Vec::new()
            }

            (Stage::Interviewing, SessionEvent::CaptureDenied) => {
                log::warn!("session: device access denied — interview disabled");
                self.stage = Stage::PermissionDenied;
                Vec::new()
            }

            (Stage::Interviewing, SessionEvent::AnswerSubmitted { record }) => {
                if self.records.len() >= self.selected.prompt_count() {
                    log::debug!("session: record for out-of-range prompt dropped");
                    return Vec::new();
                }
                self.records.push(record);

                if self.records.len() == self.selected.prompt_count() {
                    self.stage = Stage::Completed;
                    log::info!("session: all prompts answered");
                    vec![Effect::Summarize]
                } else {
                    self.current_index += 1;
                    vec![Effect::ResetCapture]
                }
            }

            (Stage::Completed, SessionEvent::SummaryReady { summary }) => {
                self.summary = Some(summary);
                Vec::new()
            }

            (stage, event) => {
                log::debug!("session: event {event:?} ignored in stage {stage:?}");
                Vec::new()
            }
        }
    }

    fn begin_interview(&mut self) -> Vec<Effect> {
        self.stage = Stage::Interviewing;
        self.current_index = 0;
        self.records.clear();
        self.summary = None;
        log::info!(
            "session: interviewing — {} prompts from '{}'",
            self.selected.prompt_count(),
            self.selected.name
        );
        vec![Effect::ResetCapture]
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Current wizard stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The question set driving this session.
    pub fn question_set(&self) -> &QuestionSet {
        &self.selected
    }

    /// Zero-based index of the prompt currently being answered.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The prompt currently being answered, if the interview is running.
    pub fn current_question(&self) -> Option<&str> {
        self.selected.prompt(self.current_index)
    }

    /// Records appended so far; never longer than the prompt list.
    pub fn records(&self) -> &[ResponseRecord] {
        &self.records
    }

    /// The overall summary, once the aggregation step has produced it.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }
}

// ---------------------------------------------------------------------------
// ImportBuffer
// ---------------------------------------------------------------------------

/// One-time hand-off of prompts produced outside the session (the resume
/// flow). Not a queue: `take` consumes the buffer, and the machine must
/// clear it immediately after consuming.
#[derive(Debug, Default)]
pub struct ImportBuffer {
    prompts: Option<Vec<String>>,
}

impl ImportBuffer {
    /// Stage prompts for the next session entry, replacing any previous
    /// hand-off.
    pub fn put(&mut self, prompts: Vec<String>) {
        self.prompts = Some(prompts);
    }

    /// Consume the staged prompts, leaving the buffer empty.
    pub fn take(&mut self) -> Option<Vec<String>> {
        self.prompts.take()
    }

    /// Returns `true` when nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.prompts.is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::catalog::built_in_catalog;

    fn record(question: &str) -> ResponseRecord {
        ResponseRecord {
            question: question.into(),
            transcript: "transcript".into(),
            feedback: "feedback".into(),
        }
    }

    fn interviewing_session(prompts: &[&str]) -> Session {
        let mut session = Session::new(built_in_catalog());
        let _ = session.apply(SessionEvent::CategorySelected { index: 0 });
        let _ = session.apply(SessionEvent::TopicSelected {
            topic: Topic::new(1, "Resume Walkthrough"),
        });
        let _ = session.apply(SessionEvent::QuestionsGenerated {
            prompts: prompts.iter().map(|s| s.to_string()).collect(),
        });
        session
    }

    // ---- Wizard navigation -------------------------------------------------

    #[test]
    fn category_pick_moves_to_topic_pick() {
        let mut session = Session::new(built_in_catalog());
        assert_eq!(session.stage(), Stage::SelectCategory);

        let effects = session.apply(SessionEvent::CategorySelected { index: 1 });
        assert!(effects.is_empty());
        assert_eq!(session.stage(), Stage::SelectTopic);
        assert_eq!(session.question_set().name, "Technical");
    }

    #[test]
    fn out_of_range_category_is_ignored() {
        let mut session = Session::new(built_in_catalog());
        let _ = session.apply(SessionEvent::CategorySelected { index: 99 });
        assert_eq!(session.stage(), Stage::SelectCategory);
    }

    #[test]
    fn topic_pick_requests_generation() {
        let mut session = Session::new(built_in_catalog());
        let _ = session.apply(SessionEvent::CategorySelected { index: 1 });

        let effects = session.apply(SessionEvent::TopicSelected {
            topic: Topic::new(1, "DSA"),
        });
        assert_eq!(
            effects,
            vec![Effect::GenerateQuestions {
                topic: "DSA".into()
            }]
        );
        // Still on the topic pick until the prompts arrive.
        assert_eq!(session.stage(), Stage::SelectTopic);
    }

    #[test]
    fn generated_prompts_start_the_interview() {
        let session = interviewing_session(&["Q1", "Q2"]);
        assert_eq!(session.stage(), Stage::Interviewing);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_question(), Some("Q1"));
        assert!(session.records().is_empty());
    }

    #[test]
    fn empty_generation_result_stays_on_topic_pick() {
        let mut session = Session::new(built_in_catalog());
        let _ = session.apply(SessionEvent::CategorySelected { index: 0 });
        let _ = session.apply(SessionEvent::TopicSelected {
            topic: Topic::new(1, "Resume Walkthrough"),
        });

        let effects = session.apply(SessionEvent::QuestionsGenerated {
            prompts: Vec::new(),
        });
        assert!(effects.is_empty());
        assert_eq!(session.stage(), Stage::SelectTopic);
    }

    #[test]
    fn back_walks_the_wizard_in_reverse() {
        let mut session = interviewing_session(&["Q1"]);

        let _ = session.apply(SessionEvent::Back);
        assert_eq!(session.stage(), Stage::SelectTopic);

        let _ = session.apply(SessionEvent::Back);
        assert_eq!(session.stage(), Stage::SelectCategory);

        // Back from the first step is ignored.
        let _ = session.apply(SessionEvent::Back);
        assert_eq!(session.stage(), Stage::SelectCategory);
    }

    // ---- Import hand-off ---------------------------------------------------

    #[test]
    fn import_skips_topic_pick_entirely() {
        let mut session = Session::new(built_in_catalog());
        let effects = session.apply(SessionEvent::QuestionsImported {
            prompts: vec!["Walk me through this project.".into()],
        });

        assert_eq!(effects, vec![Effect::ResetCapture]);
        assert_eq!(session.stage(), Stage::Interviewing);
        assert_eq!(session.question_set().name, "Resume Walkthrough");
        assert_eq!(session.current_question(), Some("Walk me through this project."));
    }

    #[test]
    fn import_buffer_is_one_time() {
        let mut buffer = ImportBuffer::default();
        assert!(buffer.is_empty());

        buffer.put(vec!["Q1".into()]);
        assert!(!buffer.is_empty());

        assert_eq!(buffer.take(), Some(vec!["Q1".into()]));
        assert!(buffer.is_empty());
        assert_eq!(buffer.take(), None);
    }

    // ---- Permission denial -------------------------------------------------

    #[test]
    fn capture_denial_is_terminal_except_back() {
        let mut session = interviewing_session(&["Q1"]);
        let _ = session.apply(SessionEvent::CaptureDenied);
        assert_eq!(session.stage(), Stage::PermissionDenied);

        // The interview flow is disabled: submitting an answer does nothing.
        let _ = session.apply(SessionEvent::AnswerSubmitted {
            record: record("Q1"),
        });
        assert_eq!(session.stage(), Stage::PermissionDenied);
        assert!(session.records().is_empty());

        let _ = session.apply(SessionEvent::Back);
        assert_eq!(session.stage(), Stage::SelectCategory);
    }

    // ---- Answer progression ------------------------------------------------

    #[test]
    fn answers_advance_then_complete() {
        let mut session = interviewing_session(&["Q1", "Q2"]);

        let effects = session.apply(SessionEvent::AnswerSubmitted {
            record: record("Q1"),
        });
        assert_eq!(effects, vec![Effect::ResetCapture]);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.current_question(), Some("Q2"));

        let effects = session.apply(SessionEvent::AnswerSubmitted {
            record: record("Q2"),
        });
        assert_eq!(effects, vec![Effect::Summarize]);
        assert_eq!(session.stage(), Stage::Completed);
        assert_eq!(session.records().len(), 2);
    }

    /// `records.len() <= prompts.len()` at every point; equality exactly in
    /// Completed.
    #[test]
    fn record_count_never_exceeds_prompt_count() {
        let mut session = interviewing_session(&["Q1"]);
        assert!(session.records().len() <= session.question_set().prompt_count());

        let _ = session.apply(SessionEvent::AnswerSubmitted {
            record: record("Q1"),
        });
        assert_eq!(session.stage(), Stage::Completed);
        assert_eq!(
            session.records().len(),
            session.question_set().prompt_count()
        );

        // A stray extra submission must not push past the prompt count.
        let _ = session.apply(SessionEvent::AnswerSubmitted {
            record: record("Q1"),
        });
        assert_eq!(
            session.records().len(),
            session.question_set().prompt_count()
        );
    }

    #[test]
    fn records_stay_index_aligned_with_prompts() {
        let mut session = interviewing_session(&["Q1", "Q2"]);
        let _ = session.apply(SessionEvent::AnswerSubmitted {
            record: record("Q1"),
        });
        let _ = session.apply(SessionEvent::AnswerSubmitted {
            record: record("Q2"),
        });

        for (i, rec) in session.records().iter().enumerate() {
            assert_eq!(Some(rec.question.as_str()), session.question_set().prompt(i));
        }
    }

    #[test]
    fn summary_lands_after_completion() {
        let mut session = interviewing_session(&["Q1"]);
        let _ = session.apply(SessionEvent::AnswerSubmitted {
            record: record("Q1"),
        });

        let _ = session.apply(SessionEvent::SummaryReady {
            summary: SessionSummary {
                feedback: "Good work".into(),
                score: 7,
            },
        });
        assert_eq!(session.summary().map(|s| s.score), Some(7));
    }

    #[test]
    fn summary_before_completion_is_ignored() {
        let mut session = interviewing_session(&["Q1"]);
        let _ = session.apply(SessionEvent::SummaryReady {
            summary: SessionSummary {
                feedback: "too early".into(),
                score: 9,
            },
        });
        assert!(session.summary().is_none());
    }

    // ---- Stage labels ------------------------------------------------------

    #[test]
    fn stage_labels() {
        assert_eq!(Stage::SelectCategory.label(), "Select a question type");
        assert_eq!(Stage::Interviewing.label(), "Interviewing");
        assert_eq!(Stage::PermissionDenied.label(), "Permission denied");
    }
}
