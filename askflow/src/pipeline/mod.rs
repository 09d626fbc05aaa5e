//! The four-stage question pipeline.
//!
//! `QuestionPipeline` routes one question through rephrase, answer,
//! score, and validate, strictly in that order, with each stage's
//! instruction built from its predecessor's extracted output, and
//! assembles the typed result handed back to the caller.

mod instructions;

#[cfg(test)]
mod integration_tests;

pub use instructions::{
    answer_instruction, rephrase_instruction, score_instruction, validate_instruction,
    QUALITY_THRESHOLD,
};

use crate::backend::TextGenerator;
use crate::errors::PipelineError;
use crate::events::{EventSink, NoOpEventSink, PipelineEvent};
use crate::executor::{RetryPolicy, StageExecutor, StageRequest};
use crate::extract::{extract_decision, extract_final_answer, extract_score, Verdict};
use crate::observability::SpanTimer;
use crate::roles::{Role, RoleOverrides, RoleProfile};
use crate::utils::generate_uuid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Terminal status of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineStatus {
    /// The validator accepted the answer.
    #[serde(rename = "validé")]
    Validated,
    /// The validator rejected the answer.
    #[serde(rename = "rejeté")]
    Rejected,
    /// The run failed before a complete result could be assembled.
    ///
    /// Never produced by a normal run: the core returns the failure
    /// itself, and the hosting layer uses this status when translating
    /// that failure for its own callers.
    #[serde(rename = "erreur")]
    Error,
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validated => write!(f, "validé"),
            Self::Rejected => write!(f, "rejeté"),
            Self::Error => write!(f, "erreur"),
        }
    }
}

impl From<Verdict> for PipelineStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Validated => Self::Validated,
            Verdict::Rejected => Self::Rejected,
        }
    }
}

/// Structured outcome of one [`QuestionPipeline::process_question`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// The question as received.
    pub original_question: String,
    /// The rephrase stage's output.
    pub refined_question: String,
    /// The answer stage's output.
    pub initial_answer: String,
    /// Quality score in `[0.0, 1.0]`.
    pub quality_score: f64,
    /// Terminal status.
    pub status: PipelineStatus,
    /// Accepted final answer, or the rejection reason.
    pub final_answer: String,
}

/// Accumulator owned by one run; fields are set monotonically, one per
/// completed stage, and never mutated afterwards.
#[derive(Debug, Default)]
struct PipelineState {
    original_question: String,
    refined_question: Option<String>,
    initial_answer: Option<String>,
    quality_score: Option<f64>,
    status: Option<PipelineStatus>,
    final_answer: Option<String>,
}

impl PipelineState {
    fn new(question: &str) -> Self {
        Self {
            original_question: question.to_string(),
            ..Self::default()
        }
    }

    /// Consumes the state into a complete result, or a typed failure when
    /// a field is missing. A partial state can never be returned as
    /// success.
    fn into_result(self) -> Result<PipelineResult, PipelineError> {
        let missing = |field| PipelineError::IncompleteResult { field };
        Ok(PipelineResult {
            original_question: self.original_question,
            refined_question: self.refined_question.ok_or(missing("refined_question"))?,
            initial_answer: self.initial_answer.ok_or(missing("initial_answer"))?,
            quality_score: self.quality_score.ok_or(missing("quality_score"))?,
            status: self.status.ok_or(missing("status"))?,
            final_answer: self.final_answer.ok_or(missing("final_answer"))?,
        })
    }
}

/// Sequences the rephrase, answer, score, and validate stages.
///
/// A pipeline is cheap to construct and shareable; each
/// `process_question` call owns its own state and stage executor, so
/// concurrent calls are independent.
pub struct QuestionPipeline {
    backend: Arc<dyn TextGenerator>,
    sink: Arc<dyn EventSink>,
    policy: RetryPolicy,
    overrides: RoleOverrides,
}

impl QuestionPipeline {
    /// Creates a pipeline over the given backend with default settings.
    #[must_use]
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self {
            backend,
            sink: Arc::new(NoOpEventSink),
            policy: RetryPolicy::default(),
            overrides: RoleOverrides::default(),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets caller overrides, merged over every role profile.
    #[must_use]
    pub fn with_role_overrides(mut self, overrides: RoleOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    fn profile(&self, role: Role) -> RoleProfile {
        role.default_profile().apply(&self.overrides)
    }

    /// Routes `question` through the four stages and assembles the result.
    ///
    /// Degraded stage output never fails the run: every stage falls back
    /// to a deterministic response and every parser has a safe default.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] only when the finished run cannot be
    /// assembled into a complete result.
    pub async fn process_question(&self, question: &str) -> Result<PipelineResult, PipelineError> {
        let run_id = generate_uuid();
        let timer = SpanTimer::start("process_question");
        tracing::info!(run_id = %run_id, question, "processing question");
        self.sink.emit(&PipelineEvent::pipeline_started(run_id, question)).await;

        let executor = StageExecutor::new(self.backend.as_ref(), self.sink.as_ref(), &self.policy);
        let mut state = PipelineState::new(question);

        let request = StageRequest::new(self.profile(Role::Rephraser), rephrase_instruction(question));
        let stage = executor.execute(&request).await;
        let refined_question = extract_final_answer(&stage.raw_text);
        state.refined_question = Some(refined_question.clone());

        let request =
            StageRequest::new(self.profile(Role::Analyst), answer_instruction(&refined_question));
        let stage = executor.execute(&request).await;
        let initial_answer = extract_final_answer(&stage.raw_text);
        state.initial_answer = Some(initial_answer.clone());

        let request =
            StageRequest::new(self.profile(Role::Evaluator), score_instruction(&initial_answer));
        let stage = executor.execute(&request).await;
        let quality_score = extract_score(&stage.raw_text);
        state.quality_score = Some(quality_score);

        let request = StageRequest::new(
            self.profile(Role::Validator),
            validate_instruction(question, &refined_question, &initial_answer, quality_score),
        );
        let stage = executor.execute(&request).await;
        let decision = extract_decision(&stage.raw_text);
        state.status = Some(decision.status.into());
        state.final_answer = Some(decision.final_answer);

        let outcome = state.into_result();
        match &outcome {
            Ok(result) => {
                tracing::info!(run_id = %run_id, status = %result.status, "question processed");
                self.sink
                    .emit(&PipelineEvent::pipeline_completed(
                        run_id,
                        result.status,
                        timer.elapsed_ms(),
                    ))
                    .await;
            }
            Err(err) => {
                tracing::error!(run_id = %run_id, error = %err, "result assembly failed");
            }
        }
        outcome
    }
}
