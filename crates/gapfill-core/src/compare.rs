//! A/B comparison of model runs.
//!
//! Ranks the [`RunAggregate`] of each model by average overall score and
//! names a winner. Ties keep the order the runs were given in.

use serde::{Deserialize, Serialize};

use crate::evaluate::RunAggregate;
use crate::obs;
use crate::quality::QualityLevel;
use crate::scoring::round3;

/// One model's aggregated run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRun {
    pub model: String,
    pub aggregate: RunAggregate,
}

impl ModelRun {
    pub fn new(model: impl Into<String>, aggregate: RunAggregate) -> Self {
        Self {
            model: model.into(),
            aggregate,
        }
    }
}

/// A model's place in the comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRanking {
    /// 1-based.
    pub rank: usize,
    pub model: String,
    pub total_gaps: usize,
    pub average_overall: f64,
    pub average_semantic: f64,
    pub average_domain_relevance: f64,
    pub average_grammar: f64,
    /// Share of gaps rated good or excellent.
    pub good_or_better_rate: f64,
}

/// Outcome of comparing model runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    /// Best first.
    pub rankings: Vec<ModelRanking>,
    /// `None` when there were no runs.
    pub winner: Option<String>,
    /// Lead of the winner over the runner-up; 0.0 with fewer than two runs.
    pub margin: f64,
}

impl ModelComparison {
    pub fn ranking(&self, model: &str) -> Option<&ModelRanking> {
        self.rankings.iter().find(|r| r.model == model)
    }

    /// Whether the top two models share the same average overall score.
    pub fn is_tie(&self) -> bool {
        self.rankings.len() >= 2 && self.margin == 0.0
    }
}

fn good_or_better_rate(aggregate: &RunAggregate) -> f64 {
    if aggregate.total_gaps == 0 {
        return 0.0;
    }
    let good = aggregate.quality_breakdown.count(QualityLevel::Excellent)
        + aggregate.quality_breakdown.count(QualityLevel::Good);
    round3(good as f64 / aggregate.total_gaps as f64)
}

/// Rank `runs` by average overall score, best first.
pub fn compare_models(runs: &[ModelRun]) -> ModelComparison {
    let mut ordered: Vec<&ModelRun> = runs.iter().collect();
    // Stable sort: equal scores keep input order.
    ordered.sort_by(|a, b| {
        b.aggregate
            .average_overall
            .total_cmp(&a.aggregate.average_overall)
    });

    let rankings: Vec<ModelRanking> = ordered
        .iter()
        .enumerate()
        .map(|(i, run)| ModelRanking {
            rank: i + 1,
            model: run.model.clone(),
            total_gaps: run.aggregate.total_gaps,
            average_overall: run.aggregate.average_overall,
            average_semantic: run.aggregate.average_semantic,
            average_domain_relevance: run.aggregate.average_domain_relevance,
            average_grammar: run.aggregate.average_grammar,
            good_or_better_rate: good_or_better_rate(&run.aggregate),
        })
        .collect();

    let winner = rankings.first().map(|r| r.model.clone());
    let margin = match (rankings.first(), rankings.get(1)) {
        (Some(first), Some(second)) => round3(first.average_overall - second.average_overall),
        _ => 0.0,
    };

    obs::emit_models_compared(rankings.len(), winner.as_deref(), margin);

    ModelComparison {
        rankings,
        winner,
        margin,
    }
}
