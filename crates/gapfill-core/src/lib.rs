//! Gapfill Core Library
//!
//! Rule-based quality scoring for words a language model put into the gaps
//! of Polish vehicle advertisements, plus the gap-marker, comparison and
//! report plumbing around it.
//!
//! ```
//! use gapfill_core::{evaluate_gap_fill, QualityLevel};
//!
//! let result = evaluate_gap_fill(1, "czerwony", "Samochód jest ładny", "");
//! assert_eq!(result.quality_level, QualityLevel::Excellent);
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod gaps;
pub mod metrics;
pub mod obs;
pub mod quality;
pub mod report;
pub mod scoring;
pub mod telemetry;
pub mod vocabulary;

pub use compare::{compare_models, ModelComparison, ModelRanking, ModelRun};
pub use config::GapfillConfig;
pub use error::{GapfillError, Result};
pub use evaluate::{
    evaluate_all, evaluate_all_parallel, evaluate_gap_fill, GapEvaluationInput,
    GapEvaluationResult, GapScorer, RunAggregate,
};
pub use gaps::{
    build_inputs, create_gaps, exact_match_rate, fill_gaps, find_gaps, GapSlot, GappedText,
};
pub use quality::{QualityBreakdown, QualityLevel};
pub use report::{
    input_digest, read_run_report_json, render_comparison_md, render_evaluations_csv,
    write_comparison_md, write_evaluations_csv, write_run_report_json, RunReport,
};
pub use scoring::{
    domain_relevance_score, grammar_score, overall_score, semantic_score, ScoreWeights,
};
pub use vocabulary::{GrammaticalCase, VocabCategory};

pub use metrics::{MetricsSnapshot, METRICS};
pub use obs::{
    emit_gap_evaluated, emit_models_compared, emit_report_written, emit_run_aggregated, RunSpan,
};
pub use telemetry::init_tracing;

/// Gapfill version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
