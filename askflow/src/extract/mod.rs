//! Parsers that turn untrusted free text into typed stage outputs.
//!
//! Every parser is total: malformed input maps to a documented default
//! (empty string, neutral score, rejection) instead of an error, so a
//! misbehaving backend can degrade a run but never abort it.

mod answer;
mod decision;
mod score;

pub use answer::{extract_final_answer, has_answer_marker};
pub use decision::{extract_decision, Decision, Verdict};
pub use score::{extract_score, DEFAULT_SCORE};
