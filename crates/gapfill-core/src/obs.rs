//! Structured tracing hooks for evaluation lifecycle events.
//!
//! - `RunSpan` tags everything inside a run with its model name
//! - `emit_*` functions log the key events: gap scored, run aggregated,
//!   models compared, report written
//!
//! Per-gap events are `debug!`; the rest are `info!`.

use tracing::{debug, info};

use crate::quality::QualityLevel;

/// RAII guard that enters a run-scoped span for the duration of a run.
///
/// ```ignore
/// let _span = RunSpan::enter("bielik-1.5b");
/// // gap and aggregate events below carry model = "bielik-1.5b"
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    pub fn enter(model: &str) -> Self {
        let span = tracing::info_span!("gapfill.run", model = %model);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: one gap scored.
pub fn emit_gap_evaluated(gap_index: u32, overall: f64, quality: QualityLevel) {
    debug!(
        event = "gap.evaluated",
        gap_index = gap_index,
        overall = overall,
        quality = %quality,
    );
}

/// Emit event: evaluations folded into a run aggregate.
pub fn emit_run_aggregated(total_gaps: usize, average_overall: f64) {
    info!(
        event = "run.aggregated",
        total_gaps = total_gaps,
        average_overall = average_overall,
    );
}

/// Emit event: model runs ranked against each other.
pub fn emit_models_compared(models: usize, winner: Option<&str>, margin: f64) {
    info!(
        event = "models.compared",
        models = models,
        winner = winner.unwrap_or("-"),
        margin = margin,
    );
}

/// Emit event: a report artifact landed on disk.
pub fn emit_report_written(kind: &str, path: &std::path::Path) {
    info!(event = "report.written", kind = %kind, path = %path.display());
}
