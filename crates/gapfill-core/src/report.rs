//! Report artifacts for evaluated runs.
//!
//! - `RunReport` — machine-readable run aggregate plus provenance (JSON)
//! - evaluation rows — one line per gap for spreadsheet export (CSV)
//! - comparison summary — ranked models (Markdown)

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::compare::ModelComparison;
use crate::error::GapfillError;
use crate::evaluate::{GapEvaluationInput, RunAggregate};
use crate::metrics::METRICS;
use crate::obs;

pub const REPORT_SCHEMA_VERSION: &str = "1.0";

const CSV_HEADER: &str = "model,gap_index,filled_word,semantic_score,domain_relevance_score,grammar_score,overall_score,quality_level";

/// Persisted result of one model's run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    /// SHA256 hex digest of the serialized inputs.
    pub input_digest: String,
    pub aggregate: RunAggregate,
}

impl RunReport {
    pub fn new(
        model: impl Into<String>,
        inputs: &[GapEvaluationInput],
        aggregate: RunAggregate,
    ) -> std::result::Result<Self, GapfillError> {
        Ok(Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            model: model.into(),
            input_digest: input_digest(inputs)?,
            aggregate,
        })
    }
}

/// SHA256 hex digest of `inputs` as compact JSON.
pub fn input_digest(inputs: &[GapEvaluationInput]) -> std::result::Result<String, GapfillError> {
    let bytes = serde_json::to_vec(inputs)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render one CSV row per evaluation, header first.
pub fn render_evaluations_csv(model: &str, aggregate: &RunAggregate) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for e in &aggregate.evaluations {
        out.push_str(&format!(
            "{},{},{},{:.3},{:.3},{:.3},{:.3},{}\n",
            csv_field(model),
            e.gap_index,
            csv_field(&e.filled_word),
            e.semantic_score,
            e.domain_relevance_score,
            e.grammar_score,
            e.overall_score,
            e.quality_level,
        ));
    }
    out
}

/// Render the ranked comparison as Markdown.
pub fn render_comparison_md(comparison: &ModelComparison) -> String {
    let mut out = String::new();
    out.push_str("# Model Comparison\n\n");
    out.push_str(&format!("- models: {}\n", comparison.rankings.len()));
    match &comparison.winner {
        Some(winner) => out.push_str(&format!(
            "- winner: `{}` (margin {:.3})\n",
            winner, comparison.margin
        )),
        None => out.push_str("- winner: none\n"),
    }

    if comparison.rankings.is_empty() {
        return out;
    }

    out.push_str("\n| rank | model | gaps | overall | semantic | domain | grammar | good+ |\n");
    out.push_str("|---|---|---|---|---|---|---|---|\n");
    for r in &comparison.rankings {
        out.push_str(&format!(
            "| {} | `{}` | {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.1}% |\n",
            r.rank,
            r.model,
            r.total_gaps,
            r.average_overall,
            r.average_semantic,
            r.average_domain_relevance,
            r.average_grammar,
            r.good_or_better_rate * 100.0,
        ));
    }
    out
}

/// Write a run report as pretty JSON.
pub fn write_run_report_json(path: &Path, report: &RunReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("serialize run report")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    METRICS.inc_reports_written();
    obs::emit_report_written("run_report", path);
    Ok(())
}

/// Read a run report written by [`write_run_report_json`].
pub fn read_run_report_json(path: &Path) -> Result<RunReport> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parse run report {:?}", path))
}

/// Write evaluation rows as CSV.
pub fn write_evaluations_csv(path: &Path, model: &str, aggregate: &RunAggregate) -> Result<()> {
    let csv = render_evaluations_csv(model, aggregate);
    std::fs::write(path, csv).with_context(|| format!("write {:?}", path))?;
    METRICS.inc_reports_written();
    obs::emit_report_written("evaluations_csv", path);
    Ok(())
}

/// Write the comparison summary as Markdown.
pub fn write_comparison_md(path: &Path, comparison: &ModelComparison) -> Result<()> {
    let md = render_comparison_md(comparison);
    std::fs::write(path, md).with_context(|| format!("write {:?}", path))?;
    METRICS.inc_reports_written();
    obs::emit_report_written("comparison_md", path);
    Ok(())
}
