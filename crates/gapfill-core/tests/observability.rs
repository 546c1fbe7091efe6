//! Observability tests for evaluation lifecycle tracing.
//!
//! Each test drives a path under `#[traced_test]` and checks the captured
//! log lines for the structured event and its fields.

use gapfill_core::{
    compare_models, emit_gap_evaluated, emit_models_compared, emit_report_written,
    emit_run_aggregated, evaluate_all, write_comparison_md, GapEvaluationInput, GapScorer,
    ModelRun, QualityLevel, RunSpan, METRICS,
};
use tracing_test::traced_test;

#[traced_test]
#[test]
fn test_emit_gap_evaluated() {
    emit_gap_evaluated(3, 0.95, QualityLevel::Excellent);
    assert!(logs_contain("gap.evaluated"));
    assert!(logs_contain("gap_index=3"));
    assert!(logs_contain("quality=excellent"));
}

#[traced_test]
#[test]
fn test_emit_run_aggregated() {
    emit_run_aggregated(12, 0.713);
    assert!(logs_contain("run.aggregated"));
    assert!(logs_contain("total_gaps=12"));
}

#[traced_test]
#[test]
fn test_emit_models_compared_without_winner() {
    emit_models_compared(0, None, 0.0);
    assert!(logs_contain("models.compared"));
    assert!(logs_contain("winner=\"-\""));
}

#[traced_test]
#[test]
fn test_emit_report_written() {
    emit_report_written("run_report", std::path::Path::new("/tmp/run.json"));
    assert!(logs_contain("report.written"));
    assert!(logs_contain("kind=run_report"));
    assert!(logs_contain("/tmp/run.json"));
}

#[traced_test]
#[test]
fn test_run_span_tags_events_with_model() {
    let _span = RunSpan::enter("bielik-1.5b");
    let agg = evaluate_all(&[GapEvaluationInput::new(1, "czerwony")]);
    assert_eq!(agg.total_gaps, 1);

    assert!(logs_contain("gapfill.run"));
    assert!(logs_contain("model=bielik-1.5b"));
    assert!(logs_contain("gap.evaluated"));
    assert!(logs_contain("run.aggregated"));
}

#[traced_test]
#[tokio::test]
async fn test_parallel_gap_events_keep_model() {
    let inputs: Vec<GapEvaluationInput> = (1..=6)
        .map(|i| GapEvaluationInput::new(i, "kombi"))
        .collect();

    let _span = RunSpan::enter("llama-3.1-8b");
    let agg = GapScorer::default()
        .evaluate_all_parallel(inputs, 2)
        .await
        .expect("parallel run");
    assert_eq!(agg.total_gaps, 6);

    logs_assert(|lines: &[&str]| {
        let tagged = lines
            .iter()
            .filter(|l| l.contains("gap.evaluated") && l.contains("model=llama-3.1-8b"))
            .count();
        if tagged == 6 {
            Ok(())
        } else {
            Err(format!("expected 6 tagged gap events, got {tagged}"))
        }
    });
}

#[traced_test]
#[test]
fn test_comparison_and_report_emit_and_count() {
    let before = METRICS.snapshot();

    let a = evaluate_all(&[GapEvaluationInput::new(1, "kombi")]);
    let b = evaluate_all(&[GapEvaluationInput::new(1, "xx")]);
    let cmp = compare_models(&[ModelRun::new("a", a), ModelRun::new("b", b)]);
    assert_eq!(cmp.winner.as_deref(), Some("a"));
    assert!(logs_contain("models.compared"));
    assert!(logs_contain("winner=\"a\""));

    let dir = tempfile::tempdir().expect("temp dir");
    write_comparison_md(&dir.path().join("cmp.md"), &cmp).expect("write md");
    assert!(logs_contain("kind=comparison_md"));

    // Other tests in this binary share the global counters.
    let delta = METRICS.flush().since(&before);
    assert!(delta.gaps_evaluated >= 2);
    assert!(delta.runs_aggregated >= 2);
    assert!(delta.reports_written >= 1);
    assert!(logs_contain("metric=\"flush\""));
}
