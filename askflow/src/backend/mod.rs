//! Text-generation backend interface.
//!
//! The backend is a black box: given a role profile and an instruction, it
//! returns free text with no format guarantee. Everything downstream
//! treats that text as untrusted and extracts what it needs.

use crate::roles::RoleProfile;
use async_trait::async_trait;
use thiserror::Error;

#[cfg(feature = "http")]
mod http;
mod mock;

#[cfg(feature = "http")]
pub use http::{HttpGenerator, HttpGeneratorConfig};
pub use mock::ScriptedGenerator;

/// Error returned by a text-generation backend.
///
/// All variants are transient from the executor's point of view: each one
/// triggers a retry, and exhausted retries degrade to the role fallback.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Transport-level failure reaching the provider.
    #[error("text generation transport failure: {0}")]
    Transport(String),

    /// The provider returned no usable content.
    #[error("text generation returned an empty response")]
    EmptyResponse,

    /// The provider answered with a non-success payload.
    #[error("text generation request refused: {0}")]
    Refused(String),
}

/// A natural-language generation capability.
///
/// One call performs one role-scoped generation. Implementations must be
/// shareable across concurrent pipeline runs; they receive the resolved
/// profile per call and hold no per-run state.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates raw text for `instruction` under the given role profile.
    async fn generate(
        &self,
        profile: &RoleProfile,
        instruction: &str,
    ) -> Result<String, BackendError>;
}
