//! End-to-end pipeline tests over a scripted backend.

use super::*;
use crate::backend::{BackendError, ScriptedGenerator};
use crate::events::CollectingEventSink;
use pretty_assertions::assert_eq;

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new().with_base_delay_ms(1)
}

fn well_formed_backend() -> Arc<ScriptedGenerator> {
    Arc::new(ScriptedGenerator::with_responses(vec![
        "Final Answer: Qu'est-ce que la ville de Grasse ?",
        "Final Answer: Grasse est connue pour ses parfums.",
        "Final Answer: Score: 0.92",
        "validé|Grasse est connue pour ses parfums.",
    ]))
}

#[tokio::test]
async fn test_well_formed_run_is_validated() {
    let backend = well_formed_backend();
    let pipeline = QuestionPipeline::new(backend.clone()).with_retry_policy(fast_policy());

    let result = pipeline.process_question("c koi Grasse?").await.unwrap();

    assert_eq!(result.original_question, "c koi Grasse?");
    assert_eq!(result.refined_question, "Qu'est-ce que la ville de Grasse ?");
    assert_eq!(result.initial_answer, "Grasse est connue pour ses parfums.");
    assert_eq!(result.quality_score, 0.92);
    assert_eq!(result.status, PipelineStatus::Validated);
    assert_eq!(result.final_answer, "Grasse est connue pour ses parfums.");
    assert_eq!(backend.call_count(), 4);
}

#[tokio::test]
async fn test_stage_outputs_thread_into_instructions() {
    let backend = well_formed_backend();
    let pipeline = QuestionPipeline::new(backend.clone()).with_retry_policy(fast_policy());

    let _ = pipeline.process_question("c koi Grasse?").await.unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].0, Role::Rephraser);
    assert!(calls[0].1.contains("c koi Grasse?"));

    assert_eq!(calls[1].0, Role::Analyst);
    assert!(calls[1].1.contains("Qu'est-ce que la ville de Grasse ?"));

    assert_eq!(calls[2].0, Role::Evaluator);
    assert!(calls[2].1.contains("Grasse est connue pour ses parfums."));

    assert_eq!(calls[3].0, Role::Validator);
    assert!(calls[3].1.contains("c koi Grasse?"));
    assert!(calls[3].1.contains("Qu'est-ce que la ville de Grasse ?"));
    assert!(calls[3].1.contains("Grasse est connue pour ses parfums."));
    assert!(calls[3].1.contains("0.92"));
}

#[tokio::test]
async fn test_validator_rejection_keeps_reason() {
    let backend = Arc::new(ScriptedGenerator::with_responses(vec![
        "Final Answer: Qu'est-ce que la ville de Grasse ?",
        "Final Answer: Grasse est connue pour ses parfums.",
        "Final Answer: Score: 0.41",
        "rejeté|Réponse trop vague pour être transmise.",
    ]));
    let pipeline = QuestionPipeline::new(backend).with_retry_policy(fast_policy());

    let result = pipeline.process_question("c koi Grasse?").await.unwrap();

    assert_eq!(result.status, PipelineStatus::Rejected);
    assert_eq!(result.quality_score, 0.41);
    assert_eq!(result.final_answer, "Réponse trop vague pour être transmise.");
}

#[tokio::test]
async fn test_validator_verdict_is_authoritative_over_threshold() {
    // Score above the advisory threshold, validator rejects anyway: the
    // parsed decision wins.
    let backend = Arc::new(ScriptedGenerator::with_responses(vec![
        "Final Answer: Qu'est-ce que la ville de Grasse ?",
        "Final Answer: Grasse est connue pour ses parfums.",
        "Final Answer: Score: 0.95",
        "rejeté|Hors du périmètre autorisé.",
    ]));
    let pipeline = QuestionPipeline::new(backend).with_retry_policy(fast_policy());

    let result = pipeline.process_question("c koi Grasse?").await.unwrap();

    assert_eq!(result.quality_score, 0.95);
    assert_eq!(result.status, PipelineStatus::Rejected);
}

#[tokio::test]
async fn test_unparseable_validator_output_is_rejected() {
    let backend = Arc::new(ScriptedGenerator::with_responses(vec![
        "Final Answer: Qu'est-ce que la ville de Grasse ?",
        "Final Answer: Grasse est connue pour ses parfums.",
        "Final Answer: Score: 0.92",
        "peut-être que oui, peut-être que non",
    ]));
    let pipeline = QuestionPipeline::new(backend).with_retry_policy(fast_policy());

    let result = pipeline.process_question("c koi Grasse?").await.unwrap();

    assert_eq!(result.status, PipelineStatus::Rejected);
    assert_eq!(result.final_answer, "");
}

#[tokio::test]
async fn test_failing_backend_degrades_to_fallbacks() {
    let backend = Arc::new(ScriptedGenerator::always_failing(BackendError::Transport(
        "connection refused".to_string(),
    )));
    let pipeline = QuestionPipeline::new(backend.clone()).with_retry_policy(fast_policy());

    let result = pipeline.process_question("c koi Grasse?").await.unwrap();

    // Every stage ran its full attempt budget.
    assert_eq!(backend.call_count(), 3 * 4);

    assert_eq!(result.refined_question, "La question n'a pas pu être reformulée.");
    assert_eq!(
        result.initial_answer,
        "Aucune réponse n'a pu être générée pour cette question."
    );
    assert_eq!(result.quality_score, 0.5);
    assert_eq!(result.status, PipelineStatus::Rejected);
    assert_eq!(
        result.final_answer,
        "Validation indisponible, la réponse n'a pas pu être contrôlée."
    );
}

#[tokio::test]
async fn test_markerless_score_output_defaults_neutral() {
    // The evaluator keeps answering without the demanded label; the
    // executor reruns it, then falls back, and the score parser lands on
    // the neutral default.
    let backend = Arc::new(ScriptedGenerator::with_responses(vec![
        "Final Answer: Qu'est-ce que la ville de Grasse ?",
        "Final Answer: Grasse est connue pour ses parfums.",
        "la qualité me semble correcte dans l'ensemble",
        "la qualité me semble correcte dans l'ensemble",
        "la qualité me semble correcte dans l'ensemble",
        "validé|Grasse est connue pour ses parfums.",
    ]));
    let pipeline = QuestionPipeline::new(backend.clone()).with_retry_policy(fast_policy());

    let result = pipeline.process_question("c koi Grasse?").await.unwrap();

    assert_eq!(result.quality_score, 0.5);
    assert_eq!(result.status, PipelineStatus::Validated);
    assert_eq!(backend.call_count(), 6);
}

#[tokio::test]
async fn test_run_emits_pipeline_and_stage_events() {
    let backend = well_formed_backend();
    let sink = Arc::new(CollectingEventSink::new());
    let pipeline = QuestionPipeline::new(backend)
        .with_event_sink(sink.clone())
        .with_retry_policy(fast_policy());

    let _ = pipeline.process_question("c koi Grasse?").await.unwrap();

    assert_eq!(sink.events_of_type("pipeline.started").len(), 1);
    assert_eq!(sink.events_of_type("pipeline.completed").len(), 1);
    assert_eq!(sink.events_of_type("stage.attempt_started").len(), 4);
    assert_eq!(sink.events_of_type("stage.completed").len(), 4);

    let completed = &sink.events_of_type("pipeline.completed")[0];
    assert_eq!(completed.data.get("status"), Some(&serde_json::json!("validé")));
}

#[tokio::test]
async fn test_concurrent_runs_are_independent() {
    let accepted = Arc::new(ScriptedGenerator::with_responses(vec![
        "Final Answer: Qu'est-ce que la ville de Grasse ?",
        "Final Answer: Grasse est connue pour ses parfums.",
        "Final Answer: Score: 0.92",
        "validé|Grasse est connue pour ses parfums.",
    ]));
    let rejected = Arc::new(ScriptedGenerator::with_responses(vec![
        "Final Answer: Quelle est la capitale de la France ?",
        "Final Answer: La capitale de la France est Paris.",
        "Final Answer: Score: 0.30",
        "rejeté|Score insuffisant.",
    ]));

    let first = QuestionPipeline::new(accepted).with_retry_policy(fast_policy());
    let second = QuestionPipeline::new(rejected).with_retry_policy(fast_policy());

    let (a, b) = tokio::join!(
        first.process_question("c koi Grasse?"),
        second.process_question("c koi la capitale?"),
    );

    assert_eq!(a.unwrap().status, PipelineStatus::Validated);
    let b = b.unwrap();
    assert_eq!(b.status, PipelineStatus::Rejected);
    assert_eq!(b.final_answer, "Score insuffisant.");
}
