//! # Askflow
//!
//! A staged question-answering pipeline over untrusted text generation.
//!
//! Askflow routes a user question through a fixed sequence of
//! text-generation stages (rephrase, answer, score, validate) and turns
//! each stage's free-form output into a structured, typed result:
//!
//! - **Stage execution**: per-role retry with linear backoff and fixed
//!   degraded fallbacks
//! - **Extraction**: total parsers that map malformed backend output to
//!   documented defaults instead of errors
//! - **Quality gating**: an accept/reject decision parsed from the
//!   validator stage, with a fail-safe rejection default
//! - **Event-driven observability**: attempt and run boundary events for
//!   monitoring
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use askflow::prelude::*;
//! use std::sync::Arc;
//!
//! let backend = Arc::new(HttpGenerator::new(HttpGeneratorConfig::from_env()?)?);
//! let pipeline = QuestionPipeline::new(backend)
//!     .with_event_sink(Arc::new(LoggingEventSink::info()));
//!
//! let result = pipeline.process_question("c koi Grasse?").await?;
//! println!("{}: {}", result.status, result.final_answer);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod backend;
pub mod errors;
pub mod events;
pub mod executor;
pub mod extract;
pub mod observability;
pub mod pipeline;
pub mod roles;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "http")]
    pub use crate::backend::{HttpGenerator, HttpGeneratorConfig};
    pub use crate::backend::{BackendError, ScriptedGenerator, TextGenerator};
    pub use crate::errors::PipelineError;
    pub use crate::events::{
        CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, PipelineEvent,
    };
    pub use crate::executor::{
        RetryPolicy, StageExecutor, StageRequest, StageResult,
    };
    pub use crate::extract::{
        extract_decision, extract_final_answer, extract_score, Decision, Verdict,
    };
    pub use crate::pipeline::{
        PipelineResult, PipelineStatus, QuestionPipeline, QUALITY_THRESHOLD,
    };
    pub use crate::roles::{Role, RoleOverrides, RoleProfile};
    pub use crate::utils::{generate_uuid, iso_timestamp};
}
