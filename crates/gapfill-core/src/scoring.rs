//! The three sub-scorers and the weighted combiner.
//!
//! Each scorer is an additive or threshold heuristic over the filled word:
//! - **Semantic plausibility**: word shape (length, vowels, suffixes, casing).
//! - **Domain relevance**: membership in the vehicle vocabulary.
//! - **Grammar**: case agreement with the preceding preposition, by suffix.
//!
//! All functions are total and return values in [0, 1].

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::vocabulary::{
    vocabulary_words, GrammaticalCase, COMMON_SUFFIXES, DOMAIN_ANCHORS, POLISH_DIACRITICS, VOWELS,
};

const BASE_DOMAIN: f64 = 0.3;
const EXACT_DOMAIN: f64 = 0.9;
const PARTIAL_DOMAIN: f64 = 0.7;
const ANCHOR_BONUS: f64 = 0.1;

const BASE_GRAMMAR: f64 = 0.5;
const CASE_MATCH_GRAMMAR: f64 = 0.85;
const BARE_NOMINATIVE_GRAMMAR: f64 = 0.8;
const DIACRITIC_BONUS: f64 = 0.1;

/// Decimal digits only (Unicode `Nd`); superscripts and numerals like "Ⅻ" don't count.
fn digits_only() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"^\d+$").expect("digit pattern is valid"))
}

/// Score how plausible `filled_word` is as an in-sentence Polish word.
///
/// `_context` is accepted for signature parity with the other scorers;
/// the heuristic only looks at the word.
pub fn semantic_score(_context: &str, filled_word: &str) -> f64 {
    let mut score = 0.0;
    let lower = filled_word.to_lowercase();
    let len = filled_word.chars().count();

    if (2..=20).contains(&len) {
        score += 0.2;
    }

    if filled_word
        .chars()
        .any(|c| c.to_lowercase().any(|l| VOWELS.contains(&l)))
    {
        score += 0.2;
    }

    if COMMON_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        score += 0.15;
    }

    if filled_word.chars().next().is_some_and(char::is_lowercase) {
        score += 0.15;
    }

    // Rejects degenerate fills like "111" or "aaaa".
    let numeric_only = digits_only().is_match(filled_word);
    let distinct = filled_word.chars().collect::<HashSet<_>>().len();
    if !numeric_only && distinct > 1 {
        score += 0.3;
    }

    cap(score)
}

/// Score how strongly `filled_word` belongs to the vehicle vocabulary.
pub fn domain_relevance_score(filled_word: &str, context: &str) -> f64 {
    let needle = filled_word.trim().to_lowercase();
    let mut score = BASE_DOMAIN;

    if vocabulary_words().any(|(_, w)| w == needle) {
        score = EXACT_DOMAIN;
    }

    // Weaker evidence: substring either way. Never lowers an exact match.
    if vocabulary_words().any(|(_, w)| w.contains(needle.as_str()) || needle.contains(w)) {
        score = score.max(PARTIAL_DOMAIN);
    }

    let context = context.to_lowercase();
    if DOMAIN_ANCHORS.iter().any(|k| context.contains(k)) {
        score = cap(score + ANCHOR_BONUS);
    }

    cap(score)
}

/// Score case agreement of `filled_word` with `preposition`.
///
/// Coarse suffix matching, not a morphological analyzer: words that share
/// an ending with an unrelated case are misclassified.
pub fn grammar_score(filled_word: &str, _context: &str, preposition: &str) -> f64 {
    let mut score = BASE_GRAMMAR;
    let word = filled_word.to_lowercase();
    let required = GrammaticalCase::for_preposition(preposition);

    if required.endings().iter().any(|e| word.ends_with(e)) {
        score = CASE_MATCH_GRAMMAR;
    }

    if preposition.trim().is_empty() && ["y", "i", "owy"].iter().any(|e| word.ends_with(e)) {
        score = BARE_NOMINATIVE_GRAMMAR;
    }

    if word.chars().any(|c| POLISH_DIACRITICS.contains(&c)) {
        score = cap(score + DIACRITIC_BONUS);
    }

    cap(score)
}

/// Weights applied by [`overall_score`].
///
/// Not required to sum to 1; callers supplying custom weights own the
/// normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub semantic: f64,
    pub domain_relevance: f64,
    pub grammar: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            semantic: 0.35,
            domain_relevance: 0.40,
            grammar: 0.25,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.semantic + self.domain_relevance + self.grammar
    }
}

/// Weighted sum of the sub-scores, capped at 1.0.
pub fn overall_score(
    semantic: f64,
    domain_relevance: f64,
    grammar: f64,
    weights: &ScoreWeights,
) -> f64 {
    let overall = semantic * weights.semantic
        + domain_relevance * weights.domain_relevance
        + grammar * weights.grammar;
    cap(overall)
}

/// Round to 3 decimal places.
///
/// Rounds the exact binary value, so 0.7825 (stored as 0.78249999...) gives
/// 0.782. Scaling by 1000 first would land on 782.5 and round up.
pub fn round3(value: f64) -> f64 {
    format!("{value:.3}").parse().unwrap_or(value)
}

fn cap(score: f64) -> f64 {
    score.min(1.0)
}
