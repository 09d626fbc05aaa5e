//! Extraction of a bounded quality score from free text.

use regex::Regex;
use std::sync::OnceLock;

/// Neutral score used when no score can be extracted.
pub const DEFAULT_SCORE: f64 = 0.5;

fn score_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)score\s*:\s*(-?\d*\.?\d+)").expect("score pattern is valid")
    })
}

/// Extracts a quality score from `text`, clamped into `[0.0, 1.0]`.
///
/// Looks for a numeric token following a `Score:` label. Out-of-range
/// values are clamped, not rejected. Empty input, a missing label, or an
/// unparseable number all yield the neutral [`DEFAULT_SCORE`]; this
/// function never fails, so the pipeline always continues with a score.
#[must_use]
pub fn extract_score(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return DEFAULT_SCORE;
    }

    score_pattern()
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .and_then(|token| token.as_str().parse::<f64>().ok())
        .map_or(DEFAULT_SCORE, |score| score.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_score_round_trips() {
        assert_eq!(extract_score("Score: 0.92"), 0.92);
        assert_eq!(extract_score("Score: 0"), 0.0);
        assert_eq!(extract_score("Score: 1"), 1.0);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        assert_eq!(extract_score("Score: 1.5"), 1.0);
        assert_eq!(extract_score("Score: -0.2"), 0.0);
        assert_eq!(extract_score("Score: 42"), 1.0);
    }

    #[test]
    fn test_empty_input_defaults() {
        assert_eq!(extract_score(""), 0.5);
        assert_eq!(extract_score("   "), 0.5);
    }

    #[test]
    fn test_missing_label_defaults() {
        assert_eq!(extract_score("the answer looks great"), 0.5);
        assert_eq!(extract_score("0.92"), 0.5);
    }

    #[test]
    fn test_label_is_case_insensitive() {
        assert_eq!(extract_score("score: 0.8"), 0.8);
        assert_eq!(extract_score("SCORE : 0.8"), 0.8);
    }

    #[test]
    fn test_leading_zero_is_optional() {
        assert_eq!(extract_score("Score: .75"), 0.75);
    }

    #[test]
    fn test_score_embedded_in_prose() {
        let text = "L'évaluation est terminée.\nFinal Answer: Score: 0.92";
        assert_eq!(extract_score(text), 0.92);
    }
}
