//! Writer/reviewer script negotiation.
//!
//! A bounded exchange between a writer model and a reviewer model:
//!
//! ```text
//! Drafting ──▶ Reviewing ──APPROVED──▶ Finished
//!                  │
//!                  └──issues──▶ Revising ──▶ Finished
//! ```
//!
//! The reviewer never rewrites content, and a revision is never reviewed
//! again. Unparseable replies and missing replies (provider failures) are
//! treated as an empty draft; [`ScriptDraft::complete_with`] fills the gaps.

use crate::interview::narration::NarrationBundle;
use serde::{Deserialize, Serialize};

/// Reply the reviewer sends when a draft passes.
pub const APPROVED: &str = "APPROVED";

/// Script fields returned by the writer. Any of them may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScriptDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing: Option<String>,
}

impl ScriptDraft {
    pub fn is_empty(&self) -> bool {
        self.intro.is_none() && self.transitions.is_none() && self.closing.is_none()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Turn the draft into a full bundle for `count` questions.
    ///
    /// A blank intro or closing, or a transition list of the wrong length, is
    /// replaced by the corresponding field of `fallback`.
    pub fn complete_with(self, fallback: NarrationBundle, count: usize) -> NarrationBundle {
        let intro = self
            .intro
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(fallback.intro);
        let transitions = self
            .transitions
            .filter(|t| t.len() == NarrationBundle::expected_transitions(count))
            .unwrap_or(fallback.transitions);
        let closing = self
            .closing
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(fallback.closing);

        NarrationBundle::new(intro, transitions, closing)
    }
}

/// Parse a writer reply. Anything that is not a JSON script object yields an empty draft.
pub fn parse_draft(response: &str) -> ScriptDraft {
    extract_json_object(response)
        .and_then(|json| serde_json::from_str::<ScriptDraft>(json).ok())
        .unwrap_or_default()
}

/// Reviewer decision on a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewVerdict {
    Approved,
    /// Concrete issues to fix; may be empty when the reply was unparseable
    Issues(Vec<String>),
}

/// Parse a reviewer reply.
///
/// Only the exact reply `APPROVED` approves; everything else asks for a revision.
pub fn parse_review(response: &str) -> ReviewVerdict {
    if response.trim() == APPROVED {
        return ReviewVerdict::Approved;
    }

    let issues = extract_json_object(response)
        .and_then(|json| serde_json::from_str::<serde_json::Value>(json).ok())
        .and_then(|value| value.get("issues").and_then(|v| v.as_array()).cloned())
        .map(|items| {
            items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    ReviewVerdict::Issues(issues)
}

fn extract_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| &response[start..=end])
}

/// Who a negotiation request is addressed to, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationRequest {
    /// Ask the writer for a first draft
    Draft,
    /// Ask the reviewer to check the draft
    Review { draft: ScriptDraft },
    /// Ask the writer to fix the draft once
    Revise { draft: ScriptDraft, issues: Vec<String> },
}

impl NegotiationRequest {
    pub fn label(&self) -> &'static str {
        match self {
            NegotiationRequest::Draft => "script_draft",
            NegotiationRequest::Review { .. } => "script_review",
            NegotiationRequest::Revise { .. } => "script_revision",
        }
    }
}

/// How a finished negotiation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationOutcome {
    Approved,
    Revised,
}

/// State of a script negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Negotiation {
    #[default]
    Drafting,
    Reviewing {
        draft: ScriptDraft,
    },
    Revising {
        draft: ScriptDraft,
        issues: Vec<String>,
    },
    Finished {
        draft: ScriptDraft,
        outcome: NegotiationOutcome,
    },
}

impl Negotiation {
    pub fn new() -> Self {
        Self::Drafting
    }

    /// The request to send next, or `None` once finished.
    pub fn next_request(&self) -> Option<NegotiationRequest> {
        match self {
            Negotiation::Drafting => Some(NegotiationRequest::Draft),
            Negotiation::Reviewing { draft } => Some(NegotiationRequest::Review {
                draft: draft.clone(),
            }),
            Negotiation::Revising { draft, issues } => Some(NegotiationRequest::Revise {
                draft: draft.clone(),
                issues: issues.clone(),
            }),
            Negotiation::Finished { .. } => None,
        }
    }

    /// Advance with the reply to the current request.
    ///
    /// `None` stands for a failed call and is handled like an unparseable reply.
    pub fn receive(self, reply: Option<&str>) -> Self {
        let reply = reply.unwrap_or_default();
        match self {
            Negotiation::Drafting => Negotiation::Reviewing {
                draft: parse_draft(reply),
            },
            Negotiation::Reviewing { draft } => match parse_review(reply) {
                ReviewVerdict::Approved => Negotiation::Finished {
                    draft,
                    outcome: NegotiationOutcome::Approved,
                },
                ReviewVerdict::Issues(issues) => Negotiation::Revising { draft, issues },
            },
            Negotiation::Revising { .. } => Negotiation::Finished {
                draft: parse_draft(reply),
                outcome: NegotiationOutcome::Revised,
            },
            finished @ Negotiation::Finished { .. } => finished,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Negotiation::Finished { .. })
    }

    pub fn outcome(&self) -> Option<NegotiationOutcome> {
        match self {
            Negotiation::Finished { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    /// The final draft; empty unless the negotiation finished.
    pub fn into_draft(self) -> ScriptDraft {
        match self {
            Negotiation::Finished { draft, .. } => draft,
            _ => ScriptDraft::default(),
        }
    }
}
