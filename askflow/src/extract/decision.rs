//! Extraction of the accept/reject verdict from the validator's output.

use super::answer::extract_final_answer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Left-hand literal accepting the answer.
const ACCEPT_LITERAL: &str = "validé";
/// Left-hand literal rejecting the answer.
const REJECT_LITERAL: &str = "rejeté";

/// Binary verdict produced by the validation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The answer was accepted.
    #[serde(rename = "validé")]
    Validated,
    /// The answer was rejected.
    #[serde(rename = "rejeté")]
    Rejected,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validated => write!(f, "validé"),
            Self::Rejected => write!(f, "rejeté"),
        }
    }
}

/// Parsed outcome of the validation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Accept/reject verdict.
    pub status: Verdict,
    /// Accepted final answer, or the rejection reason. Empty when the
    /// validator's output was unusable.
    pub final_answer: String,
}

impl Decision {
    fn rejected_empty() -> Self {
        Self {
            status: Verdict::Rejected,
            final_answer: String::new(),
        }
    }
}

/// Extracts an accept/reject decision from `text`.
///
/// The input is first passed through [`extract_final_answer`] to strip any
/// surrounding reasoning, then split on the first `|` into a status token
/// and a payload. The status token is trimmed, lowercased, and matched
/// against exactly `validé` and `rejeté`. Any other token, or a missing
/// separator, maps to a rejection with an empty payload: ambiguous
/// validator output is never treated as an approval.
#[must_use]
pub fn extract_decision(text: &str) -> Decision {
    let span = extract_final_answer(text);
    let Some((status_token, payload)) = span.split_once('|') else {
        return Decision::rejected_empty();
    };

    match status_token.trim().to_lowercase().as_str() {
        ACCEPT_LITERAL => Decision {
            status: Verdict::Validated,
            final_answer: payload.trim().to_string(),
        },
        REJECT_LITERAL => Decision {
            status: Verdict::Rejected,
            final_answer: payload.trim().to_string(),
        },
        _ => Decision::rejected_empty(),
    }
}
