//! Pipeline events for observability.
//!
//! Stage executors and the orchestrator emit a [`PipelineEvent`] at every
//! attempt and run boundary; sinks decide what to do with them.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use crate::pipeline::PipelineStatus;
use crate::roles::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// An event emitted during pipeline execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// The event type (e.g., "stage.attempt_started").
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the event occurred (ISO 8601).
    pub timestamp: String,

    /// The event payload data.
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
}

impl PipelineEvent {
    /// Creates a new event with no data.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp: crate::utils::iso_timestamp(),
            data: HashMap::new(),
        }
    }

    /// Adds a data field to the event.
    #[must_use]
    pub fn add_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Creates a "stage.attempt_started" event.
    #[must_use]
    pub fn attempt_started(role: Role, attempt: usize) -> Self {
        Self::new("stage.attempt_started")
            .add_data("role", serde_json::json!(role.to_string()))
            .add_data("attempt", serde_json::json!(attempt))
    }

    /// Creates a "stage.attempt_failed" event.
    #[must_use]
    pub fn attempt_failed(role: Role, attempt: usize, reason: &str) -> Self {
        Self::new("stage.attempt_failed")
            .add_data("role", serde_json::json!(role.to_string()))
            .add_data("attempt", serde_json::json!(attempt))
            .add_data("reason", serde_json::json!(reason))
    }

    /// Creates a "stage.retrying" event.
    #[must_use]
    pub fn retrying(role: Role, attempt: usize, delay_ms: u64) -> Self {
        Self::new("stage.retrying")
            .add_data("role", serde_json::json!(role.to_string()))
            .add_data("attempt", serde_json::json!(attempt))
            .add_data("delay_ms", serde_json::json!(delay_ms))
    }

    /// Creates a "stage.fallback" event.
    #[must_use]
    pub fn fallback_used(role: Role) -> Self {
        Self::new("stage.fallback").add_data("role", serde_json::json!(role.to_string()))
    }

    /// Creates a "stage.completed" event.
    #[must_use]
    pub fn stage_completed(role: Role, attempts: usize, duration_ms: f64) -> Self {
        Self::new("stage.completed")
            .add_data("role", serde_json::json!(role.to_string()))
            .add_data("attempts", serde_json::json!(attempts))
            .add_data("duration_ms", serde_json::json!(duration_ms))
    }

    /// Creates a "pipeline.started" event.
    #[must_use]
    pub fn pipeline_started(run_id: Uuid, question: &str) -> Self {
        Self::new("pipeline.started")
            .add_data("run_id", serde_json::json!(run_id.to_string()))
            .add_data("question", serde_json::json!(question))
    }

    /// Creates a "pipeline.completed" event.
    #[must_use]
    pub fn pipeline_completed(run_id: Uuid, status: PipelineStatus, duration_ms: f64) -> Self {
        Self::new("pipeline.completed")
            .add_data("run_id", serde_json::json!(run_id.to_string()))
            .add_data("status", serde_json::json!(status.to_string()))
            .add_data("duration_ms", serde_json::json!(duration_ms))
    }
}
