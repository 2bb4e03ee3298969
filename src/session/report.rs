//! Per-question records, the session summary and score extraction.
//!
//! Score extraction scrapes the generated narrative for a `Score: X/10`
//! phrase (or the looser "a X out of 10"). The pattern match is a weak
//! contract with the generation collaborator and is kept exactly as loose as
//! the deployed behaviour: no match means score 0, not an error.

use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ResponseRecord
// ---------------------------------------------------------------------------

/// One answered question: the prompt, what the candidate said, and what the
/// generation collaborator thought of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub question: String,
    pub transcript: String,
    pub feedback: String,
}

// ---------------------------------------------------------------------------
// SessionSummary
// ---------------------------------------------------------------------------

/// Final aggregated narrative and score, computed once after the last
/// answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Overall narrative, with markdown bold markers stripped for display.
    pub feedback: String,
    /// Overall score out of 10; 0 when no score phrase was found.
    pub score: u8,
}

impl SessionSummary {
    /// Build a summary from the raw generated narrative.
    pub fn from_generated(text: &str) -> Self {
        Self {
            feedback: tidy_feedback(text),
            score: extract_score(text),
        }
    }
}

// ---------------------------------------------------------------------------
// Score extraction
// ---------------------------------------------------------------------------

/// Extract the overall score from a generated narrative.
///
/// Two phrasings are recognised: `Score: X/10` and `a X out of 10`.
/// Anything else — including a missing or unparseable number — yields 0.
pub fn extract_score(text: &str) -> u8 {
    let (Ok(strict), Ok(loose)) = (
        Regex::new(r"Score:\s*(\d+)/10"),
        Regex::new(r"a (\d+) out of 10"),
    ) else {
        return 0;
    };

    strict
        .captures(text)
        .or_else(|| loose.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .unwrap_or(0)
}

/// Strip markdown bold markers from a generated narrative.
pub fn tidy_feedback(text: &str) -> String {
    text.replace("**", "")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- extract_score -----------------------------------------------------

    #[test]
    fn extracts_strict_score_phrase() {
        let text = "Overall Assessment: solid effort.\nScore: 7/10";
        assert_eq!(extract_score(text), 7);
    }

    #[test]
    fn extracts_loose_score_phrase() {
        let text = "I would give this candidate a 4 out of 10 overall.";
        assert_eq!(extract_score(text), 4);
    }

    #[test]
    fn strict_phrase_wins_over_loose() {
        let text = "Score: 8/10, which is a 9 out of 10 day for them.";
        assert_eq!(extract_score(text), 8);
    }

    #[test]
    fn missing_pattern_defaults_to_zero() {
        assert_eq!(extract_score("The candidate did reasonably well."), 0);
        assert_eq!(extract_score(""), 0);
    }

    #[test]
    fn tolerates_whitespace_after_colon() {
        assert_eq!(extract_score("Score:   10/10"), 10);
        assert_eq!(extract_score("Score:0/10"), 0);
    }

    #[test]
    fn unparseable_number_defaults_to_zero() {
        // 300 overflows u8; the weak contract falls back to 0 rather than
        // erroring.
        assert_eq!(extract_score("Score: 300/10"), 0);
    }

    // ---- tidy_feedback -----------------------------------------------------

    #[test]
    fn strips_bold_markers() {
        assert_eq!(
            tidy_feedback("**Strengths:** clear answers"),
            "Strengths: clear answers"
        );
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(tidy_feedback("no markers here"), "no markers here");
    }

    // ---- SessionSummary ----------------------------------------------------

    #[test]
    fn summary_combines_tidy_and_score() {
        let summary = SessionSummary::from_generated("**Overall**: good.\nScore: 6/10");
        assert_eq!(summary.score, 6);
        assert_eq!(summary.feedback, "Overall: good.\nScore: 6/10");
    }
}
