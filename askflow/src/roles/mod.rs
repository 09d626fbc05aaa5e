//! Role definitions and per-role generation profiles.
//!
//! Each pipeline stage is backed by one role. A role's behavior is fully
//! described by its [`RoleProfile`] table entry: persona text, decoding
//! parameters, response contract, and degraded fallback. There is no
//! per-role control flow anywhere else in the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default model requested from the generation backend.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// The four fixed roles of the question pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Reformulates the incoming question for clarity.
    Rephraser,
    /// Produces the initial answer from the refined question.
    Analyst,
    /// Scores the quality of the generated answer.
    Evaluator,
    /// Accepts or rejects the final answer.
    Validator,
}

impl Role {
    /// All roles, in pipeline order.
    pub const ALL: [Self; 4] = [Self::Rephraser, Self::Analyst, Self::Evaluator, Self::Validator];

    /// Returns the default profile for this role.
    #[must_use]
    pub fn default_profile(self) -> RoleProfile {
        match self {
            Self::Rephraser => RoleProfile {
                role: self,
                persona: "Expert en reformulation et clarification de questions. \
                          Votre rôle est d'analyser les questions des utilisateurs et de les \
                          reformuler pour une meilleure compréhension et un traitement optimal, \
                          tout en préservant leur intention."
                    .to_string(),
                model: DEFAULT_MODEL.to_string(),
                temperature: 0.7,
                min_response_length: 10,
                requires_marker: true,
                fallback: "Final Answer: La question n'a pas pu être reformulée.".to_string(),
            },
            Self::Analyst => RoleProfile {
                role: self,
                persona: "Expert en analyse et génération de réponses. \
                          Votre rôle est de fournir des réponses précises, détaillées et \
                          pertinentes aux questions des utilisateurs."
                    .to_string(),
                model: DEFAULT_MODEL.to_string(),
                temperature: 0.5,
                min_response_length: 20,
                requires_marker: true,
                fallback: "Final Answer: Aucune réponse n'a pu être générée pour cette question."
                    .to_string(),
            },
            Self::Evaluator => RoleProfile {
                role: self,
                persona: "Expert en contrôle qualité. \
                          Votre rôle est d'évaluer la qualité et la pertinence des réponses \
                          générées. Vous devez fournir un score numérique entre 0 et 1 au \
                          format 'Score: X.XX'."
                    .to_string(),
                model: DEFAULT_MODEL.to_string(),
                temperature: 0.3,
                min_response_length: 8,
                requires_marker: true,
                fallback: "Final Answer: Score: 0.5".to_string(),
            },
            Self::Validator => RoleProfile {
                role: self,
                persona: "Superviseur général du processus. \
                          Votre rôle est de valider les réponses finales et d'assurer la \
                          cohérence globale du processus avant leur transmission."
                    .to_string(),
                model: DEFAULT_MODEL.to_string(),
                temperature: 0.4,
                min_response_length: 6,
                // The validator answers in the `statut|contenu` format, which
                // carries no final-answer marker.
                requires_marker: false,
                fallback: "rejeté|Validation indisponible, la réponse n'a pas pu être contrôlée."
                    .to_string(),
            },
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rephraser => write!(f, "rephraser"),
            Self::Analyst => write!(f, "analyst"),
            Self::Evaluator => write!(f, "evaluator"),
            Self::Validator => write!(f, "validator"),
        }
    }
}

/// Generation profile for one role.
///
/// Profiles are plain data: the stage executor and the backends read them,
/// nothing mutates them after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleProfile {
    /// The role this profile describes.
    pub role: Role,
    /// System persona handed to the backend.
    pub persona: String,
    /// Model requested from the backend.
    pub model: String,
    /// Decoding temperature.
    pub temperature: f32,
    /// Minimum acceptable response length, in characters after trimming.
    pub min_response_length: usize,
    /// Whether a raw response must carry a recognized final-answer marker.
    pub requires_marker: bool,
    /// Fixed degraded response used when every attempt is exhausted.
    pub fallback: String,
}

impl RoleProfile {
    /// Returns a copy of this profile with `overrides` applied.
    #[must_use]
    pub fn apply(&self, overrides: &RoleOverrides) -> Self {
        let mut profile = self.clone();
        if let Some(ref model) = overrides.model {
            profile.model.clone_from(model);
        }
        if let Some(temperature) = overrides.temperature {
            profile.temperature = temperature;
        }
        if let Some(min_response_length) = overrides.min_response_length {
            profile.min_response_length = min_response_length;
        }
        profile
    }
}

/// Optional caller overrides, merged over every role profile.
///
/// Unset fields keep the profile's default. Persona, response contract and
/// fallback are not overridable: they are part of the pipeline's protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleOverrides {
    /// Replacement model identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Replacement decoding temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Replacement minimum response length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_response_length: Option<usize>,
}

impl RoleOverrides {
    /// Creates empty overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the decoding temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the minimum response length.
    #[must_use]
    pub fn with_min_response_length(mut self, length: usize) -> Self {
        self.min_response_length = Some(length);
        self
    }
}
