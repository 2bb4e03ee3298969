//! Session model — catalog, state machine, records and summary.
//!
//! This module provides:
//! * [`QuestionSet`] / [`Topic`] / [`Difficulty`] / [`QuestionKind`] — the
//!   category catalog.
//! * [`Session`] — the explicit session object; all mutation goes through
//!   [`Session::apply`], which returns [`Effect`]s for the orchestrator.
//! * [`ResponseRecord`] / [`SessionSummary`] — per-question results and the
//!   final aggregate, including `Score: X/10` extraction.
//! * [`ImportBuffer`] — one-time hand-off of externally generated prompts.

pub mod catalog;
pub mod report;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use catalog::{built_in_catalog, Difficulty, QuestionKind, QuestionSet, Topic};
pub use report::{extract_score, tidy_feedback, ResponseRecord, SessionSummary};
pub use state::{Effect, ImportBuffer, Session, SessionEvent, Stage};
