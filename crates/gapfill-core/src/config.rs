//! Runtime configuration.
//!
//! Loaded from a JSON file, either passed explicitly or named by the
//! `GAPFILL_CONFIG` environment variable. Every field has a default, so a
//! partial file (or no file at all) is fine.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GapfillError, Result};
use crate::evaluate::GapScorer;
use crate::scoring::ScoreWeights;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "GAPFILL_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapfillConfig {
    /// Combiner weights.
    pub weights: ScoreWeights,

    /// Tokens taken on each side of a gap marker as its context.
    pub context_window: usize,

    /// Inputs per blocking task in parallel batches.
    pub parallel_chunk_size: usize,
}

impl Default for GapfillConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            context_window: 5,
            parallel_chunk_size: 64,
        }
    }
}

impl GapfillConfig {
    /// Load and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load from `GAPFILL_CONFIG` if set, defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                info!(path = %path, "using config from {}", CONFIG_ENV);
                Self::from_json_file(Path::new(path.trim()))
            }
            _ => Ok(Self::default()),
        }
    }

    /// Reject weights that would push scores outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        for (name, value) in [
            ("semantic", w.semantic),
            ("domain_relevance", w.domain_relevance),
            ("grammar", w.grammar),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GapfillError::InvalidConfig(format!(
                    "weight {name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        // Small slack for weights like 0.35 + 0.40 + 0.25 that don't sum exactly.
        if w.sum() > 1.0 + 1e-9 {
            return Err(GapfillError::InvalidConfig(format!(
                "weights sum to {:.3}, must not exceed 1.0",
                w.sum()
            )));
        }

        if self.parallel_chunk_size == 0 {
            return Err(GapfillError::InvalidConfig(
                "parallel_chunk_size must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Scorer using the configured weights.
    pub fn scorer(&self) -> GapScorer {
        GapScorer::new(self.weights)
    }
}
