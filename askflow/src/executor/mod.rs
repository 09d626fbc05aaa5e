//! Stage execution against a text-generation backend.
//!
//! The executor owns the minimum-quality contract on raw backend output:
//! a response must be non-empty, long enough for its role, and (when the
//! role demands one) carry a recognized final-answer marker. Anything
//! less is retried, and exhausted retries degrade to the role's fixed
//! fallback so the pipeline always completes.

mod retry;

pub use retry::RetryPolicy;

use crate::backend::TextGenerator;
use crate::events::{EventSink, PipelineEvent};
use crate::extract::has_answer_marker;
use crate::observability::SpanTimer;
use crate::roles::{Role, RoleProfile};
use thiserror::Error;

/// A single stage invocation request.
///
/// Immutable once built; one request is created per stage and discarded
/// after the stage completes.
#[derive(Debug, Clone)]
pub struct StageRequest {
    /// Resolved generation profile for the stage's role.
    pub profile: RoleProfile,
    /// Instruction text, built from prior stage outputs and static rules.
    pub instruction: String,
    /// Minimum acceptable response length, in characters after trimming.
    pub min_response_length: usize,
}

impl StageRequest {
    /// Creates a request; the length floor defaults from the profile.
    #[must_use]
    pub fn new(profile: RoleProfile, instruction: impl Into<String>) -> Self {
        let min_response_length = profile.min_response_length;
        Self {
            profile,
            instruction: instruction.into(),
            min_response_length,
        }
    }

    /// Overrides the length floor for this request only.
    #[must_use]
    pub fn with_min_response_length(mut self, length: usize) -> Self {
        self.min_response_length = length;
        self
    }

    /// Returns the stage's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.profile.role
    }
}

/// Raw outcome of one stage execution.
#[derive(Debug, Clone)]
pub struct StageResult {
    /// Unprocessed backend output, or the role fallback when degraded.
    pub raw_text: String,
    /// False when every attempt failed and the fallback was used.
    pub succeeded: bool,
    /// Number of generation attempts performed.
    pub attempts: usize,
}

/// Why a raw response failed the stage's minimum-quality contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseRejection {
    /// The response is empty after trimming.
    #[error("response is empty after trimming")]
    Empty,

    /// The response is shorter than the stage's floor.
    #[error("response length {actual} is below the {required} character floor")]
    TooShort {
        /// Trimmed response length in characters.
        actual: usize,
        /// The stage's minimum length.
        required: usize,
    },

    /// The response carries no recognized final-answer marker.
    #[error("response carries no recognized final-answer marker")]
    MissingMarker,
}

/// Checks `raw` against the request's minimum-quality contract.
///
/// # Errors
///
/// Returns the first [`ResponseRejection`] the response triggers.
pub fn validate_response(raw: &str, request: &StageRequest) -> Result<(), ResponseRejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ResponseRejection::Empty);
    }

    let actual = trimmed.chars().count();
    if actual < request.min_response_length {
        return Err(ResponseRejection::TooShort {
            actual,
            required: request.min_response_length,
        });
    }

    if request.profile.requires_marker && !has_answer_marker(trimmed) {
        return Err(ResponseRejection::MissingMarker);
    }

    Ok(())
}

/// Runs one stage with validation, linear-backoff retries, and a
/// deterministic fallback.
///
/// Executors are cheap, borrow everything they need, and live for one
/// `process_question` call.
pub struct StageExecutor<'a> {
    backend: &'a dyn TextGenerator,
    sink: &'a dyn EventSink,
    policy: &'a RetryPolicy,
}

impl<'a> StageExecutor<'a> {
    /// Creates an executor over the given backend, sink, and policy.
    #[must_use]
    pub fn new(
        backend: &'a dyn TextGenerator,
        sink: &'a dyn EventSink,
        policy: &'a RetryPolicy,
    ) -> Self {
        Self {
            backend,
            sink,
            policy,
        }
    }

    /// Executes the stage described by `request`.
    ///
    /// Returns the raw validated backend output, or the role's fixed
    /// fallback once the attempt budget is exhausted. Never fails: a
    /// degraded result is still a result.
    pub async fn execute(&self, request: &StageRequest) -> StageResult {
        let role = request.role();
        let timer = SpanTimer::start(role.to_string());

        for attempt in 0..self.policy.max_attempts {
            self.sink.emit(&PipelineEvent::attempt_started(role, attempt)).await;

            let rejection = match self.backend.generate(&request.profile, &request.instruction).await
            {
                Ok(raw) => match validate_response(&raw, request) {
                    Ok(()) => {
                        let attempts = attempt + 1;
                        self.sink
                            .emit(&PipelineEvent::stage_completed(role, attempts, timer.elapsed_ms()))
                            .await;
                        return StageResult {
                            raw_text: raw,
                            succeeded: true,
                            attempts,
                        };
                    }
                    Err(rejection) => rejection.to_string(),
                },
                Err(err) => err.to_string(),
            };

            tracing::warn!(role = %role, attempt, reason = %rejection, "stage attempt failed");
            self.sink
                .emit(&PipelineEvent::attempt_failed(role, attempt, &rejection))
                .await;

            if attempt + 1 < self.policy.max_attempts {
                let delay = self.policy.delay_for(attempt);
                self.sink
                    .emit(&PipelineEvent::retrying(role, attempt, delay.as_millis() as u64))
                    .await;
                tokio::time::sleep(delay).await;
            }
        }

        tracing::warn!(role = %role, "attempt budget exhausted, using role fallback");
        self.sink.emit(&PipelineEvent::fallback_used(role)).await;

        StageResult {
            raw_text: request.profile.fallback.clone(),
            succeeded: false,
            attempts: self.policy.max_attempts,
        }
    }
}
