//! Single-gap evaluation and run-level aggregation.
//!
//! [`GapScorer`] runs the three sub-scorers, combines them with its
//! [`ScoreWeights`], rounds to 3 decimals and classifies the result. The free
//! functions [`evaluate_gap_fill`] and [`evaluate_all`] use the default
//! weights.

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use crate::error::{GapfillError, Result};
use crate::metrics::METRICS;
use crate::obs;
use crate::quality::{QualityBreakdown, QualityLevel};
use crate::scoring::{
    domain_relevance_score, grammar_score, overall_score, round3, semantic_score, ScoreWeights,
};

/// One filled gap to evaluate.
///
/// Accepts the short field names `index` / `word` on input; missing
/// `context` and `preposition` become empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapEvaluationInput {
    #[serde(alias = "index")]
    pub gap_index: u32,
    #[serde(alias = "word")]
    pub filled_word: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub preposition: String,
}

impl GapEvaluationInput {
    pub fn new(gap_index: u32, filled_word: impl Into<String>) -> Self {
        Self {
            gap_index,
            filled_word: filled_word.into(),
            context: String::new(),
            preposition: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_preposition(mut self, preposition: impl Into<String>) -> Self {
        self.preposition = preposition.into();
        self
    }
}

/// Scores for a single gap fill. Scores are rounded to 3 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapEvaluationResult {
    pub gap_index: u32,
    pub filled_word: String,
    pub semantic_score: f64,
    pub domain_relevance_score: f64,
    pub grammar_score: f64,
    pub overall_score: f64,
    pub quality_level: QualityLevel,
}

/// Run-level statistics over a sequence of gap evaluations.
///
/// # Invariants
///
/// Everything except `evaluations` is derived from `evaluations`; build it
/// with [`RunAggregate::from_evaluations`] rather than by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunAggregate {
    /// Per-gap results, in input order.
    #[serde(alias = "gap_evaluations")]
    pub evaluations: Vec<GapEvaluationResult>,
    pub average_semantic: f64,
    pub average_domain_relevance: f64,
    pub average_grammar: f64,
    pub average_overall: f64,
    pub total_gaps: usize,
    pub quality_breakdown: QualityBreakdown,
}

impl RunAggregate {
    /// Aggregate `evaluations`. An empty sequence yields zeroed averages.
    pub fn from_evaluations(evaluations: Vec<GapEvaluationResult>) -> Self {
        let total = evaluations.len();
        let mean = |f: fn(&GapEvaluationResult) -> f64| {
            if total == 0 {
                0.0
            } else {
                round3(evaluations.iter().map(f).sum::<f64>() / total as f64)
            }
        };

        let average_semantic = mean(|e| e.semantic_score);
        let average_domain_relevance = mean(|e| e.domain_relevance_score);
        let average_grammar = mean(|e| e.grammar_score);
        let average_overall = mean(|e| e.overall_score);
        let quality_breakdown: QualityBreakdown =
            evaluations.iter().map(|e| e.quality_level).collect();

        METRICS.inc_runs_aggregated();
        obs::emit_run_aggregated(total, average_overall);

        Self {
            evaluations,
            average_semantic,
            average_domain_relevance,
            average_grammar,
            average_overall,
            total_gaps: total,
            quality_breakdown,
        }
    }
}

/// Evaluator holding the combiner weights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GapScorer {
    weights: ScoreWeights,
}

impl GapScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Evaluate one gap fill. Never fails; empty words just score low.
    pub fn evaluate(
        &self,
        gap_index: u32,
        filled_word: &str,
        context: &str,
        preposition: &str,
    ) -> GapEvaluationResult {
        let semantic = semantic_score(context, filled_word);
        let domain = domain_relevance_score(filled_word, context);
        let grammar = grammar_score(filled_word, context, preposition);
        let overall = overall_score(semantic, domain, grammar, &self.weights);
        let quality_level = QualityLevel::classify(overall);

        METRICS.inc_gaps_evaluated();
        obs::emit_gap_evaluated(gap_index, overall, quality_level);

        GapEvaluationResult {
            gap_index,
            filled_word: filled_word.to_string(),
            semantic_score: round3(semantic),
            domain_relevance_score: round3(domain),
            grammar_score: round3(grammar),
            overall_score: round3(overall),
            quality_level,
        }
    }

    pub fn evaluate_input(&self, input: &GapEvaluationInput) -> GapEvaluationResult {
        self.evaluate(
            input.gap_index,
            &input.filled_word,
            &input.context,
            &input.preposition,
        )
    }

    /// Evaluate every input in order and aggregate.
    pub fn evaluate_all(&self, inputs: &[GapEvaluationInput]) -> RunAggregate {
        let evaluations = inputs.iter().map(|i| self.evaluate_input(i)).collect();
        RunAggregate::from_evaluations(evaluations)
    }

    /// Like [`GapScorer::evaluate_all`], but chunks are scored on blocking
    /// tasks concurrently. Output order matches input order.
    pub async fn evaluate_all_parallel(
        &self,
        inputs: Vec<GapEvaluationInput>,
        chunk_size: usize,
    ) -> Result<RunAggregate> {
        if chunk_size == 0 {
            return Err(GapfillError::InvalidConfig(
                "parallel chunk size must be positive".to_string(),
            ));
        }

        let scorer = *self;
        let mut join_set = JoinSet::new();
        for (chunk_idx, chunk) in inputs.chunks(chunk_size).enumerate() {
            let chunk = chunk.to_vec();
            // Blocking threads don't inherit the caller's span (and its model field).
            let span = tracing::Span::current();
            join_set.spawn_blocking(move || {
                let _entered = span.enter();
                let results: Vec<GapEvaluationResult> =
                    chunk.iter().map(|i| scorer.evaluate_input(i)).collect();
                (chunk_idx, results)
            });
        }

        let mut chunks = Vec::with_capacity(join_set.len());
        while let Some(joined) = join_set.join_next().await {
            let (chunk_idx, results) = joined.map_err(|e| GapfillError::Task(e.to_string()))?;
            chunks.push((chunk_idx, results));
        }
        chunks.sort_by_key(|(idx, _)| *idx);

        let evaluations = chunks.into_iter().flat_map(|(_, r)| r).collect();
        Ok(RunAggregate::from_evaluations(evaluations))
    }
}

/// Evaluate one gap fill with the default weights.
pub fn evaluate_gap_fill(
    gap_index: u32,
    filled_word: &str,
    context: &str,
    preposition: &str,
) -> GapEvaluationResult {
    GapScorer::default().evaluate(gap_index, filled_word, context, preposition)
}

/// Evaluate a run of gap fills with the default weights.
pub fn evaluate_all(inputs: &[GapEvaluationInput]) -> RunAggregate {
    GapScorer::default().evaluate_all(inputs)
}

/// Parallel [`evaluate_all`] with the default weights.
pub async fn evaluate_all_parallel(
    inputs: Vec<GapEvaluationInput>,
    chunk_size: usize,
) -> Result<RunAggregate> {
    GapScorer::default()
        .evaluate_all_parallel(inputs, chunk_size)
        .await
}
