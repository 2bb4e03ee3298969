//! Prompt builder for the text-generation collaborator.
//!
//! [`PromptBuilder`] constructs the four prompts the product sends:
//! * per-answer feedback, with a rubric that varies by question category
//!   (behavioral responses are judged on STAR/PAR structure, technical ones
//!   on coherence and topic relevance);
//! * the overall-summary prompt built from every answered question;
//! * topic-seeded question generation;
//! * keyword-seeded question generation for the resume flow.
//!
//! The summary prompt instructs the collaborator to phrase the score as
//! `Score: X/10` — the exact phrase the aggregation step scrapes for.

use crate::session::{QuestionKind, ResponseRecord};

// ---------------------------------------------------------------------------
// Rubrics
// ---------------------------------------------------------------------------

/// Behavioral answers — structure and communication.
const RUBRIC_BEHAVIORAL: &str = "\
Please also give feedback on the candidate's communication skills. Make sure \
their response is structured (perhaps using the STAR or PAR frameworks). Be \
critical with your feedback and provide actionable advice. If no transcript \
is received or it is irrelevant, make sure to mention that in the feedback. \
Be strict with your feedback.";

/// Technical answers — coherence and staying on topic.
const RUBRIC_TECHNICAL: &str = "\
Please also give feedback on the candidate's communication skills. Make sure \
they accurately explain their thoughts in a coherent way. Make sure they stay \
on topic and relevant to the question. Be critical with your feedback and \
provide actionable advice. If no transcript is received or it is irrelevant, \
make sure to mention that in the feedback. Be strict with your feedback.";

/// Framing for the overall summary, ending with the scoring instruction the
/// aggregator scrapes for.
const SUMMARY_INSTRUCTIONS: &str = "\
Based on the feedback above, provide an overall evaluation of the candidate's \
performance. Include the following:
1. Strengths: What did the candidate do well across all responses? If none is \
found, mention that.
2. Weaknesses: What areas need improvement?
3. Suggestions: Provide actionable advice for the candidate to improve their \
interview skills.
4. Overall Assessment: Summarize the candidate's performance in one or two \
sentences.
5. Score: Provide a score out of 10 based on their performance. Consider \
factors like clarity, relevance, communication skills, and technical accuracy \
(if applicable). The score should be displayed as \"Score: X/10\". Be very \
critical with your evaluation.

Ensure the feedback is constructive, professional, and tailored to help the \
candidate improve. The scoring and feedback should be strict.";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds generation prompts for every stage of the interview flow.
///
/// # Example
/// ```rust
/// use interview_coach::services::PromptBuilder;
/// use interview_coach::session::QuestionKind;
///
/// let builder = PromptBuilder::new();
/// let prompt = builder.answer_feedback(
///     QuestionKind::Technical,
///     "What is a hash table?",
///     "A hash table maps keys to values…",
/// );
/// assert!(prompt.contains("What is a hash table?"));
/// ```
#[derive(Debug, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Per-answer feedback prompt embedding the question, the transcript and
    /// the category rubric.
    pub fn answer_feedback(&self, kind: QuestionKind, question: &str, transcript: &str) -> String {
        format!(
            "Please give feedback on the following interview question: {question} \
             given the following transcript: {transcript}. {rubric}\n\n\
             Feedback on the candidate's response:",
            rubric = self.rubric(kind),
        )
    }

    /// Overall-summary prompt built from every answered question.
    pub fn overall_summary(&self, records: &[ResponseRecord]) -> String {
        let feedback_summary = records
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                format!(
                    "Question {n}: {question}\nFeedback: {feedback}\n",
                    n = i + 1,
                    question = rec.question,
                    feedback = rec.feedback,
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are an expert career coach analyzing a candidate's performance \
             in a mock interview. Below is the feedback for each question the \
             candidate answered:\n\n---\n{feedback_summary}\n---\n\n{SUMMARY_INSTRUCTIONS}"
        )
    }

    /// Topic-seeded question generation.
    pub fn topic_questions(&self, topic: &str) -> String {
        format!(
            "Generate 5 short and concise random interview questions related to \
             the topic: {topic}. Ensure they are easy to medium difficulty and \
             relevant for job interviews."
        )
    }

    /// Keyword-seeded question generation for the resume flow.
    pub fn resume_questions(&self, keywords: &[String], job_description: &str) -> String {
        format!(
            "Generate 5 random interview questions based on these keywords: \
             {keywords} for this job description: {job_description}. Exclude any \
             questions related to schooling and educational background. Only \
             return the questions, without any introductory or concluding \
             statements.",
            keywords = keywords.join(", "),
        )
    }

    fn rubric(&self, kind: QuestionKind) -> &'static str {
        match kind {
            QuestionKind::Behavioral => RUBRIC_BEHAVIORAL,
            QuestionKind::Technical => RUBRIC_TECHNICAL,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question: &str, feedback: &str) -> ResponseRecord {
        ResponseRecord {
            question: question.into(),
            transcript: "transcript".into(),
            feedback: feedback.into(),
        }
    }

    // ---- answer_feedback ---------------------------------------------------

    #[test]
    fn feedback_prompt_embeds_question_and_transcript() {
        let builder = PromptBuilder::new();
        let prompt = builder.answer_feedback(
            QuestionKind::Behavioral,
            "Tell me about yourself.",
            "I am a systems engineer.",
        );

        assert!(prompt.contains("Tell me about yourself."));
        assert!(prompt.contains("I am a systems engineer."));
        assert!(prompt.ends_with("Feedback on the candidate's response:"));
    }

    #[test]
    fn behavioral_rubric_checks_structure() {
        let builder = PromptBuilder::new();
        let prompt = builder.answer_feedback(QuestionKind::Behavioral, "Q", "T");

        assert!(prompt.contains("STAR or PAR"));
        assert!(prompt.contains("Be strict with your feedback."));
    }

    #[test]
    fn technical_rubric_checks_coherence() {
        let builder = PromptBuilder::new();
        let prompt = builder.answer_feedback(QuestionKind::Technical, "Q", "T");

        assert!(prompt.contains("coherent way"));
        assert!(prompt.contains("stay on topic"));
        assert!(!prompt.contains("STAR or PAR"));
    }

    /// A moderation/error payload used as the transcript flows into the
    /// prompt verbatim, so the collaborator can comment on it.
    #[test]
    fn error_payload_as_transcript_is_embedded_verbatim() {
        let builder = PromptBuilder::new();
        let prompt = builder.answer_feedback(
            QuestionKind::Behavioral,
            "Q",
            "Inappropriate content detected. Please try again.",
        );
        assert!(prompt.contains("Inappropriate content detected."));
    }

    // ---- overall_summary ---------------------------------------------------

    #[test]
    fn summary_prompt_numbers_every_question() {
        let builder = PromptBuilder::new();
        let prompt = builder.overall_summary(&[
            record("Q-one", "good structure"),
            record("Q-two", "rambled a bit"),
        ]);

        assert!(prompt.contains("Question 1: Q-one"));
        assert!(prompt.contains("Feedback: good structure"));
        assert!(prompt.contains("Question 2: Q-two"));
        assert!(prompt.contains("Feedback: rambled a bit"));
    }

    #[test]
    fn summary_prompt_requests_the_scrapeable_score_phrase() {
        let builder = PromptBuilder::new();
        let prompt = builder.overall_summary(&[record("Q", "F")]);

        assert!(prompt.contains("expert career coach"));
        assert!(prompt.contains("\"Score: X/10\""));
    }

    // ---- question generation -----------------------------------------------

    #[test]
    fn topic_prompt_embeds_topic() {
        let builder = PromptBuilder::new();
        let prompt = builder.topic_questions("DSA");
        assert!(prompt.contains("the topic: DSA"));
        assert!(prompt.contains("Generate 5"));
    }

    #[test]
    fn resume_prompt_joins_keywords_and_excludes_schooling() {
        let builder = PromptBuilder::new();
        let prompt = builder.resume_questions(
            &["rust".into(), "tokio".into(), "kubernetes".into()],
            "Backend engineer",
        );

        assert!(prompt.contains("rust, tokio, kubernetes"));
        assert!(prompt.contains("Backend engineer"));
        assert!(prompt.contains("Exclude any questions related to schooling"));
        assert!(prompt.contains("without any introductory or concluding"));
    }
}
