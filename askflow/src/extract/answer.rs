//! Extraction of the declared final-answer span from free text.

use regex::Regex;
use std::sync::OnceLock;

/// Marker keywords introducing a final-answer span, in priority order.
///
/// `final answer` is the primary marker; the French variants are fallbacks
/// seen in the wild when a backend ignores the requested format.
const MARKERS: [&str; 3] = ["final answer", "réponse finale", "réponse"];

fn marker_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        MARKERS
            .iter()
            .map(|marker| {
                // Keyword match is case-insensitive; `\s*:` tolerates the
                // French space before the colon. The payload runs to the
                // end of the line.
                Regex::new(&format!(r"(?i){marker}\s*:[ \t]*([^\r\n]*)"))
                    .expect("marker pattern is valid")
            })
            .collect()
    })
}

/// Pulls the declared final answer out of `text`.
///
/// Searches the recognized markers in priority order and returns the
/// trimmed payload of the *last* occurrence of the first marker that
/// matches: backends often think aloud through several candidate answers
/// before settling, and the final statement is the authoritative one.
///
/// Empty or whitespace-only input returns an empty string. Input with no
/// marker at all is returned trimmed but otherwise verbatim; content the
/// caller cannot parse is never silently dropped.
#[must_use]
pub fn extract_final_answer(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    for pattern in marker_patterns() {
        if let Some(captures) = pattern.captures_iter(trimmed).last() {
            if let Some(payload) = captures.get(1) {
                return payload.as_str().trim().to_string();
            }
        }
    }

    trimmed.to_string()
}

/// Returns true if `text` contains any recognized final-answer marker.
#[must_use]
pub fn has_answer_marker(text: &str) -> bool {
    marker_patterns().iter().any(|pattern| pattern.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input_returns_empty() {
        assert_eq!(extract_final_answer(""), "");
        assert_eq!(extract_final_answer("   \n\t  "), "");
    }

    #[test]
    fn test_extracts_after_primary_marker() {
        let text = "Thought: hmm\nFinal Answer: Grasse is known for perfume";
        assert_eq!(extract_final_answer(text), "Grasse is known for perfume");
    }

    #[test]
    fn test_no_marker_passes_through() {
        assert_eq!(
            extract_final_answer("no markers here at all"),
            "no markers here at all"
        );
    }

    #[test]
    fn test_last_occurrence_wins() {
        let text = "Final Answer: first guess\nMore thinking...\nFinal Answer: settled answer";
        assert_eq!(extract_final_answer(text), "settled answer");
    }

    #[test]
    fn test_marker_is_case_insensitive_payload_case_preserved() {
        assert_eq!(
            extract_final_answer("FINAL ANSWER: La Ville de Grasse"),
            "La Ville de Grasse"
        );
        assert_eq!(extract_final_answer("final answer: MiXeD CaSe"), "MiXeD CaSe");
    }

    #[test]
    fn test_french_fallback_markers() {
        assert_eq!(
            extract_final_answer("Réponse finale: Paris est la capitale"),
            "Paris est la capitale"
        );
        assert_eq!(extract_final_answer("Réponse: oui"), "oui");
    }

    #[test]
    fn test_french_spacing_before_colon() {
        assert_eq!(extract_final_answer("Final Answer : avec espace"), "avec espace");
    }

    #[test]
    fn test_primary_marker_beats_fallbacks() {
        let text = "Réponse: brouillon\nFinal Answer: version retenue";
        assert_eq!(extract_final_answer(text), "version retenue");
    }

    #[test]
    fn test_payload_stops_at_line_break() {
        let text = "Final Answer: only this line\nnot this one";
        assert_eq!(extract_final_answer(text), "only this line");
    }

    #[test]
    fn test_empty_payload_after_marker() {
        assert_eq!(extract_final_answer("Final Answer:"), "");
    }

    #[test]
    fn test_has_answer_marker() {
        assert!(has_answer_marker("Final Answer: oui"));
        assert!(has_answer_marker("réponse finale: oui"));
        assert!(!has_answer_marker("just prose"));
        assert!(!has_answer_marker("validé|Paris"));
    }
}
