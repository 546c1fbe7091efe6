//! Discrete quality levels derived from the overall score.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Quality bucket of a single gap fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    Unacceptable,
    Poor,
    Acceptable,
    Good,
    Excellent,
}

impl QualityLevel {
    /// All levels, best first.
    pub const ALL: [QualityLevel; 5] = [
        QualityLevel::Excellent,
        QualityLevel::Good,
        QualityLevel::Acceptable,
        QualityLevel::Poor,
        QualityLevel::Unacceptable,
    ];

    /// Classify an overall score. Boundary values belong to the higher bucket.
    pub fn classify(score: f64) -> Self {
        if score >= 0.85 {
            Self::Excellent
        } else if score >= 0.70 {
            Self::Good
        } else if score >= 0.55 {
            Self::Acceptable
        } else if score >= 0.40 {
            Self::Poor
        } else {
            Self::Unacceptable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Acceptable => "acceptable",
            Self::Poor => "poor",
            Self::Unacceptable => "unacceptable",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of evaluations per quality level. Every level is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub excellent: usize,
    pub good: usize,
    pub acceptable: usize,
    pub poor: usize,
    pub unacceptable: usize,
}

impl QualityBreakdown {
    /// Count one evaluation at `level`.
    pub fn record(&mut self, level: QualityLevel) {
        *self.slot(level) += 1;
    }

    /// Count at `level`.
    pub fn count(&self, level: QualityLevel) -> usize {
        match level {
            QualityLevel::Excellent => self.excellent,
            QualityLevel::Good => self.good,
            QualityLevel::Acceptable => self.acceptable,
            QualityLevel::Poor => self.poor,
            QualityLevel::Unacceptable => self.unacceptable,
        }
    }

    pub fn total(&self) -> usize {
        QualityLevel::ALL.iter().map(|l| self.count(*l)).sum()
    }

    fn slot(&mut self, level: QualityLevel) -> &mut usize {
        match level {
            QualityLevel::Excellent => &mut self.excellent,
            QualityLevel::Good => &mut self.good,
            QualityLevel::Acceptable => &mut self.acceptable,
            QualityLevel::Poor => &mut self.poor,
            QualityLevel::Unacceptable => &mut self.unacceptable,
        }
    }
}

impl FromIterator<QualityLevel> for QualityBreakdown {
    fn from_iter<I: IntoIterator<Item = QualityLevel>>(iter: I) -> Self {
        let mut breakdown = Self::default();
        for level in iter {
            breakdown.record(level);
        }
        breakdown
    }
}
