//! Prompt templates for grading, feedback and script generation

use crate::interview::summary::SessionSummary;
use crate::script::negotiation::{NegotiationRequest, ScriptDraft};

/// Default system prompt of the rubric grader.
pub const DEFAULT_RUBRIC_SYSTEM: &str =
    "You are a strict Computer Science interview grader. Respond in the exact format requested.";

/// Default anchor criteria of the rubric grader.
pub const DEFAULT_RUBRIC_ANCHORS: &str = r#"- 100: correct, with at least two substantive supporting details
- 75: generally correct
- 50: partially correct
- 25: right topic but confused reasoning
- 0: off-topic, unrelated, nonsensical or empty"#;

/// Templates for generating prompts at each stage
pub struct InterviewPromptTemplate;

impl InterviewPromptTemplate {
    /// User prompt asking for a rubric verdict
    pub fn rubric_prompt(
        question: &str,
        reference: &str,
        answer: &str,
        keywords: &[String],
        anchors: &str,
    ) -> String {
        format!(
            r#"Grade the candidate's answer against the rubric.

QUESTION: {}
KEYWORDS: {}
REFERENCE: {}
ANSWER: {}

RUBRIC (pick exactly one value):
{}

Reply with a single line in this format:
SCORE: <0|25|50|75|100>"#,
            question,
            keywords.join(", "),
            reference,
            answer,
            anchors
        )
    }

    /// System prompt for per-answer feedback
    pub fn feedback_system() -> &'static str {
        r#"You are an expert interview coach.
Provide constructive feedback on the candidate's answer to the interview question.
Highlight strengths and areas for improvement in a concise manner."#
    }

    /// User prompt for per-answer feedback
    pub fn feedback_prompt(question: &str, reference: &str, transcript: &str, score: u8) -> String {
        format!(
            r#"Question:
{}

Reference Answer:
{}

Candidate's Answer:
{}

Score (0-100): {}

Write 2-4 sentences of feedback on the candidate's answer.
Mention what they did well and what could be improved.
Be concise and specific."#,
            question, reference, transcript, score
        )
    }

    /// System prompt for the session-level feedback
    pub fn aggregate_system() -> &'static str {
        r#"You are an expert interview coach.
Provide overall constructive feedback based on a complete interview.
Highlight common strengths and areas for improvement in a concise manner."#
    }

    /// User prompt for the session-level feedback.
    ///
    /// Pending answers are sent with a `null` score.
    pub fn aggregate_prompt(summary: &SessionSummary) -> String {
        let rows: Vec<serde_json::Value> = summary
            .answers
            .iter()
            .map(|a| {
                serde_json::json!({
                    "topic": a.topic,
                    "question": a.question_text,
                    "reference_answer": a.reference_answer,
                    "answer": a.transcript,
                    "score": a.score,
                })
            })
            .collect();
        let interview =
            serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string());

        format!(
            r#"Here is the whole interview as JSON. For each question it contains the topic, reference answer, candidate answer and score (0-100, null if not graded yet):

{}

Write:
1. A short overall summary
2. Common strengths across the answers
3. Common areas for improvement across the answers
4. Trends you noticed
5. Next steps: what to practice
6. Whether answers were too short or too long"#,
            interview
        )
    }

    /// System prompt of the script writer
    pub fn script_writer_system() -> &'static str {
        r#"You write a short interview script for a technical interview.
Return ONLY JSON with keys: intro, transitions, closing.
Rules:
- transitions length must equal (question_count - 1)
- Keep each line short (<= 18 words)
- Neutral tone: do NOT praise or judge answers (no 'good answer')
- Sound like a real interviewer"#
    }

    /// System prompt of the script reviewer
    pub fn script_reviewer_system() -> &'static str {
        r#"You validate the script JSON and enforce the rules strictly.
Rules: transitions length must equal (question_count - 1); each line <= 18 words; neutral tone.
If valid, reply exactly: APPROVED
If invalid, reply exactly in JSON: {"issues":[...]} listing concrete issues.
Do NOT rewrite the script yourself."#
    }

    pub fn script_draft_prompt(topics: &[String], count: usize) -> String {
        serde_json::json!({
            "question_count": count,
            "question_topics": topics,
            "output_format": {
                "intro": "string",
                "transitions": ["string"],
                "closing": "string",
            },
        })
        .to_string()
    }

    pub fn script_review_prompt(draft: &ScriptDraft, count: usize) -> String {
        serde_json::json!({
            "question_count": count,
            "script": draft,
        })
        .to_string()
    }

    pub fn script_revision_prompt(draft: &ScriptDraft, issues: &[String], count: usize) -> String {
        serde_json::json!({
            "question_count": count,
            "draft": draft,
            "issues": issues,
            "instruction": "Fix the issues and return ONLY corrected JSON in the required format.",
        })
        .to_string()
    }

    /// `(system, user)` prompts for a negotiation request.
    pub fn negotiation_prompts(
        request: &NegotiationRequest,
        topics: &[String],
        count: usize,
    ) -> (&'static str, String) {
        match request {
            NegotiationRequest::Draft => (
                Self::script_writer_system(),
                Self::script_draft_prompt(topics, count),
            ),
            NegotiationRequest::Review { draft } => (
                Self::script_reviewer_system(),
                Self::script_review_prompt(draft, count),
            ),
            NegotiationRequest::Revise { draft, issues } => (
                Self::script_writer_system(),
                Self::script_revision_prompt(draft, issues, count),
            ),
        }
    }
}
