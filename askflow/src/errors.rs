//! Pipeline-level error taxonomy.
//!
//! Recoverable failures (backend errors, malformed stage output) never
//! surface here: they are absorbed by retries, fallbacks, and parser
//! defaults. What remains is the unrecoverable case: the run finished
//! its stages but could not assemble a complete result, and the caller
//! must observe that directly rather than receive a half-filled success.

use thiserror::Error;

/// Errors surfaced to the pipeline caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A result field was never produced by its stage.
    #[error("result assembly failed: `{field}` was never set")]
    IncompleteResult {
        /// Name of the missing result field.
        field: &'static str,
    },
}
