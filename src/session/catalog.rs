//! Question sets, topics and the built-in catalog.
//!
//! A [`QuestionSet`] is immutable once selected for a session, except that
//! its prompt list may be replaced wholesale by a generation result
//! ([`QuestionSet::replace_prompts`]).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Difficulty / QuestionKind
// ---------------------------------------------------------------------------

/// Difficulty tag shown on the category picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Question category — selects which feedback rubric the generation
/// collaborator is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Soft-skill questions; feedback checks for STAR/PAR structure.
    Behavioral,
    /// Knowledge questions; feedback checks coherence and topic relevance.
    Technical,
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// A selectable topic within a question set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: u32,
    pub name: String,
}

impl Topic {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// QuestionSet
// ---------------------------------------------------------------------------

/// Named, described, difficulty-tagged collection of topics and prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub kind: QuestionKind,
    /// Topics the candidate can pick from; question generation is seeded
    /// with the chosen topic's name.
    pub topics: Vec<Topic>,
    /// Ordered interview prompts. Empty until a generation result (or an
    /// import) fills it.
    pub prompts: Vec<String>,
}

impl QuestionSet {
    /// Replace the prompt list wholesale with a generation result.
    pub fn replace_prompts(&mut self, prompts: Vec<String>) {
        self.prompts = prompts;
    }

    /// The prompt at `index`, if any.
    pub fn prompt(&self, index: usize) -> Option<&str> {
        self.prompts.get(index).map(String::as_str)
    }

    /// Number of prompts in this set.
    pub fn prompt_count(&self) -> usize {
        self.prompts.len()
    }

    /// A set holding prompts handed off from the resume-intake flow.
    pub fn imported(prompts: Vec<String>) -> Self {
        Self {
            id: 0,
            name: "Resume Walkthrough".into(),
            description: "Generated from your resume".into(),
            difficulty: Difficulty::Easy,
            kind: QuestionKind::Behavioral,
            topics: vec![Topic::new(1, "Resume Walkthrough")],
            prompts,
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in catalog
// ---------------------------------------------------------------------------

/// The static category catalog the session starts from.
pub fn built_in_catalog() -> Vec<QuestionSet> {
    vec![
        QuestionSet {
            id: 1,
            name: "Behavioral".into(),
            description: "From LinkedIn, Amazon, Adobe".into(),
            difficulty: Difficulty::Easy,
            kind: QuestionKind::Behavioral,
            topics: vec![
                Topic::new(1, "Resume Walkthrough"),
                Topic::new(2, "Strengths and Weaknesses"),
            ],
            prompts: Vec::new(),
        },
        QuestionSet {
            id: 2,
            name: "Technical".into(),
            description: "From Google, Meta, and Apple".into(),
            difficulty: Difficulty::Medium,
            kind: QuestionKind::Technical,
            topics: vec![
                Topic::new(1, "DSA"),
                Topic::new(2, "OS"),
                Topic::new(3, "OOPS"),
                Topic::new(4, "DBMS"),
            ],
            prompts: Vec::new(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
