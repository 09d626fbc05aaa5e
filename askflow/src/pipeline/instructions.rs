//! Instruction builders for each stage.
//!
//! Each builder embeds the previous stage's extracted output into a
//! French instruction, followed by the static format rule that makes the
//! response machine-extractable.

/// Advisory quality threshold communicated to the validator.
///
/// Guidance only: the validator's own parsed decision is authoritative,
/// even when it disagrees with the threshold.
pub const QUALITY_THRESHOLD: f64 = 0.7;

/// Builds the rephrase-stage instruction.
#[must_use]
pub fn rephrase_instruction(question: &str) -> String {
    format!(
        "Analyser et reformuler la question suivante pour plus de clarté, \
         en préservant son intention : {question}\n\
         Terminez votre réponse par une ligne au format \
         'Final Answer: <question reformulée>'."
    )
}

/// Builds the answer-stage instruction.
#[must_use]
pub fn answer_instruction(refined_question: &str) -> String {
    format!(
        "Générer une réponse détaillée et précise à la question suivante : \
         {refined_question}\n\
         Terminez votre réponse par une ligne au format 'Final Answer: <réponse>'."
    )
}

/// Builds the score-stage instruction.
#[must_use]
pub fn score_instruction(answer: &str) -> String {
    format!(
        "Évaluer la qualité et la pertinence de la réponse suivante : {answer}\n\
         Fournir un score numérique entre 0 et 1.\n\
         Terminez votre réponse par une ligne au format 'Final Answer: Score: X.XX'."
    )
}

/// Builds the validate-stage instruction.
#[must_use]
pub fn validate_instruction(
    original_question: &str,
    refined_question: &str,
    answer: &str,
    score: f64,
) -> String {
    format!(
        "Valider la réponse finale avant son retour à l'utilisateur.\n\
         Question originale : {original_question}\n\
         Question reformulée : {refined_question}\n\
         Réponse proposée : {answer}\n\
         Score de qualité : {score:.2}\n\
         Accepter la réponse si le score est supérieur ou égal à \
         {QUALITY_THRESHOLD}, la rejeter sinon.\n\
         Répondre sur une seule ligne au format 'validé|<réponse finale>' \
         ou 'rejeté|<raison du rejet>'."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rephrase_embeds_question() {
        let instruction = rephrase_instruction("c koi Grasse?");
        assert!(instruction.contains("c koi Grasse?"));
        assert!(instruction.contains("Final Answer:"));
    }

    #[test]
    fn test_answer_embeds_refined_question() {
        let instruction = answer_instruction("Qu'est-ce que la ville de Grasse ?");
        assert!(instruction.contains("Qu'est-ce que la ville de Grasse ?"));
    }

    #[test]
    fn test_score_demands_score_format() {
        let instruction = score_instruction("Grasse est connue pour ses parfums.");
        assert!(instruction.contains("Score: X.XX"));
    }

    #[test]
    fn test_validate_embeds_all_context() {
        let instruction = validate_instruction(
            "c koi Grasse?",
            "Qu'est-ce que la ville de Grasse ?",
            "Grasse est connue pour ses parfums.",
            0.92,
        );
        assert!(instruction.contains("c koi Grasse?"));
        assert!(instruction.contains("Qu'est-ce que la ville de Grasse ?"));
        assert!(instruction.contains("Grasse est connue pour ses parfums."));
        assert!(instruction.contains("0.92"));
        assert!(instruction.contains("0.7"));
        assert!(instruction.contains("validé|"));
        assert!(instruction.contains("rejeté|"));
    }
}
