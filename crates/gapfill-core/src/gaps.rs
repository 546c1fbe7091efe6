//! `[GAP:n]` marker handling.
//!
//! Advertisement texts are prepared for a gap-filling model by replacing
//! some word tokens with numbered markers. This module creates those
//! markers, locates them again (with the context and preposition the
//! scorer needs), and writes fills back into the text.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{GapfillError, Result};
use crate::evaluate::GapEvaluationInput;
use crate::scoring::round3;
use crate::vocabulary::{is_known_preposition, POLISH_DIACRITICS};

fn gap_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"\[GAP:(\d+)\]").expect("gap marker pattern is valid"))
}

/// Render the marker for gap `index`.
pub fn marker(index: u32) -> String {
    format!("[GAP:{index}]")
}

/// A text with some words replaced by gap markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GappedText {
    pub text_with_gaps: String,
    /// Word tokens in the source text (numbers and punctuation excluded).
    pub word_count: usize,
    pub gaps_created: usize,
    pub removal_percent: f64,
    /// Removed tokens keyed by gap index; the reference fills.
    pub removed: BTreeMap<u32, String>,
}

/// Location of one marker plus the inputs the scorer needs for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapSlot {
    pub gap_index: u32,
    /// Whitespace-token position of the marker.
    pub position: usize,
    /// Preceding token when it is a known preposition, else empty.
    pub preposition: String,
    /// Up to `window` tokens on each side, marker excluded.
    pub context: String,
}

/// A token is a word when it contains a Latin or Polish letter.
fn is_word(token: &str) -> bool {
    token.chars().any(|c| {
        c.is_ascii_alphabetic() || c.to_lowercase().any(|l| POLISH_DIACRITICS.contains(&l))
    })
}

fn selection_rank(seed: u64, position: usize) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update((position as u64).to_le_bytes());
    let mut rank = [0u8; 32];
    rank.copy_from_slice(&hasher.finalize());
    rank
}

/// Replace `ceil(words * removal_percent / 100)` word tokens with markers.
///
/// Numbers and punctuation-only tokens are never removed. Markers are
/// numbered from 1, left to right. The same `seed` always picks the same
/// tokens. Whitespace is normalized to single spaces.
pub fn create_gaps(text: &str, removal_percent: f64, seed: u64) -> Result<GappedText> {
    if text.trim().is_empty() {
        return Err(GapfillError::InvalidText(
            "text cannot be empty".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&removal_percent) {
        return Err(GapfillError::InvalidRemovalPercent(removal_percent));
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let word_positions: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| is_word(t))
        .map(|(i, _)| i)
        .collect();

    if word_positions.is_empty() {
        return Err(GapfillError::InvalidText(
            "no words found to remove".to_string(),
        ));
    }

    let to_remove = (word_positions.len() as f64 * removal_percent / 100.0).ceil() as usize;
    let mut ranked = word_positions.clone();
    ranked.sort_by_key(|&pos| selection_rank(seed, pos));
    let selected: BTreeSet<usize> = ranked.into_iter().take(to_remove).collect();

    let mut removed = BTreeMap::new();
    let mut next_index = 1u32;
    let gapped: Vec<String> = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            if selected.contains(&i) {
                let index = next_index;
                next_index += 1;
                removed.insert(index, (*token).to_string());
                marker(index)
            } else {
                (*token).to_string()
            }
        })
        .collect();

    debug!(
        words = word_positions.len(),
        gaps = selected.len(),
        seed = seed,
        "gaps created"
    );

    Ok(GappedText {
        text_with_gaps: gapped.join(" "),
        word_count: word_positions.len(),
        gaps_created: selected.len(),
        removal_percent,
        removed,
    })
}

/// Locate every marker in `text_with_gaps`, in text order.
pub fn find_gaps(text_with_gaps: &str, window: usize) -> Vec<GapSlot> {
    let tokens: Vec<&str> = text_with_gaps.split_whitespace().collect();
    let mut slots = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        for caps in gap_marker().captures_iter(token) {
            // Indices that overflow u32 are not markers we produced.
            let Ok(gap_index) = caps[1].parse::<u32>() else {
                continue;
            };

            let preposition = position
                .checked_sub(1)
                .map(|p| tokens[p])
                .filter(|t| is_known_preposition(t))
                .unwrap_or_default()
                .to_string();

            let before = &tokens[position.saturating_sub(window)..position];
            let after_end = position
                .saturating_add(1)
                .saturating_add(window)
                .min(tokens.len());
            let after = &tokens[position + 1..after_end];
            let context = before
                .iter()
                .chain(after.iter())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");

            slots.push(GapSlot {
                gap_index,
                position,
                preposition,
                context,
            });
        }
    }

    slots
}

/// Pair markers with fills. Markers without a fill are skipped.
pub fn build_inputs(
    text_with_gaps: &str,
    fills: &BTreeMap<u32, String>,
    window: usize,
) -> Vec<GapEvaluationInput> {
    find_gaps(text_with_gaps, window)
        .into_iter()
        .filter_map(|slot| {
            fills.get(&slot.gap_index).map(|word| {
                GapEvaluationInput::new(slot.gap_index, word.clone())
                    .with_context(slot.context)
                    .with_preposition(slot.preposition)
            })
        })
        .collect()
}

/// Write fills into their markers. Unfilled markers stay in place.
pub fn fill_gaps(text_with_gaps: &str, fills: &BTreeMap<u32, String>) -> String {
    gap_marker()
        .replace_all(text_with_gaps, |caps: &Captures<'_>| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(|i| fills.get(&i))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Share of removed words a model restored exactly (trimmed,
/// case-insensitive). Zero when nothing was removed.
pub fn exact_match_rate(removed: &BTreeMap<u32, String>, fills: &BTreeMap<u32, String>) -> f64 {
    if removed.is_empty() {
        return 0.0;
    }
    let hits = removed
        .iter()
        .filter(|(index, original)| {
            fills
                .get(*index)
                .is_some_and(|f| f.trim().to_lowercase() == original.trim().to_lowercase())
        })
        .count();
    round3(hits as f64 / removed.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AD: &str = "BMW 320i zadbane 2020 45000km piękny silnik benzynowy";

    fn fills(pairs: &[(u32, &str)]) -> BTreeMap<u32, String> {
        pairs.iter().map(|(i, w)| (*i, w.to_string())).collect()
    }

    #[test]
    fn word_detection_skips_numbers() {
        assert!(is_word("BMW"));
        assert!(is_word("320i"));
        assert!(is_word("żółć"));
        assert!(!is_word("2020"));
        assert!(!is_word("-"));
    }

    #[test]
    fn create_gaps_is_deterministic_per_seed() {
        let a = create_gaps(AD, 50.0, 7).expect("create gaps");
        let b = create_gaps(AD, 50.0, 7).expect("create gaps");
        assert_eq!(a, b);
        // "45000km" carries letters, so it counts as a word
        assert_eq!(a.word_count, 7);
        assert_eq!(a.gaps_created, 4);
        assert_eq!(a.removed.len(), 4);
    }

    #[test]
    fn create_gaps_never_removes_numbers() {
        let gapped = create_gaps(AD, 100.0, 1).expect("create gaps");
        assert_eq!(gapped.gaps_created, 7);
        assert_eq!(
            gapped.text_with_gaps,
            "[GAP:1] [GAP:2] [GAP:3] 2020 [GAP:4] [GAP:5] [GAP:6] [GAP:7]"
        );
        assert_eq!(gapped.removed[&1], "BMW");
        assert_eq!(gapped.removed[&4], "45000km");
        assert_eq!(gapped.removed[&7], "benzynowy");
    }

    #[test]
    fn create_gaps_rounds_up() {
        // 10% of 7 words is 0.7 -> 1 gap
        let gapped = create_gaps(AD, 10.0, 3).expect("create gaps");
        assert_eq!(gapped.gaps_created, 1);
        assert!(gapped.text_with_gaps.contains("[GAP:1]"));
        assert!(!gapped.text_with_gaps.contains("[GAP:2]"));
    }

    #[test]
    fn zero_percent_removes_nothing() {
        let gapped = create_gaps(AD, 0.0, 3).expect("create gaps");
        assert_eq!(gapped.gaps_created, 0);
        assert_eq!(gapped.text_with_gaps, AD);
    }

    #[test]
    fn create_gaps_errors() {
        assert!(matches!(
            create_gaps("   ", 10.0, 0),
            Err(GapfillError::InvalidText(_))
        ));
        assert!(matches!(
            create_gaps("2020 150000", 10.0, 0),
            Err(GapfillError::InvalidText(_))
        ));
        assert!(matches!(
            create_gaps(AD, 101.0, 0),
            Err(GapfillError::InvalidRemovalPercent(_))
        ));
        assert!(matches!(
            create_gaps(AD, f64::NAN, 0),
            Err(GapfillError::InvalidRemovalPercent(_))
        ));
    }

    #[test]
    fn fill_restores_original() {
        let gapped =
            create_gaps("  Auto   w kolorze  czerwonym ", 60.0, 42).expect("create gaps");
        let restored = fill_gaps(&gapped.text_with_gaps, &gapped.removed);
        assert_eq!(restored, "Auto w kolorze czerwonym");
    }

    #[test]
    fn find_gaps_reads_preposition_and_context() {
        let text = "Sprzedam auto z [GAP:1] silnikiem w [GAP:2] stanie";
        let slots = find_gaps(text, 2);
        assert_eq!(slots.len(), 2);

        assert_eq!(slots[0].gap_index, 1);
        assert_eq!(slots[0].position, 3);
        assert_eq!(slots[0].preposition, "z");
        assert_eq!(slots[0].context, "auto z silnikiem w");

        assert_eq!(slots[1].gap_index, 2);
        assert_eq!(slots[1].preposition, "w");
        assert_eq!(slots[1].context, "silnikiem w stanie");
    }

    #[test]
    fn find_gaps_without_preposition() {
        let slots = find_gaps("[GAP:4] samochód", 5);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].gap_index, 4);
        assert!(slots[0].preposition.is_empty());
        assert_eq!(slots[0].context, "samochód");
    }

    #[test]
    fn find_gaps_with_unbounded_window_takes_whole_text() {
        let slots = find_gaps("a [GAP:1] b", usize::MAX);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].context, "a b");
        assert_eq!(slots[0].position, 1);
    }

    #[test]
    fn find_gaps_handles_attached_punctuation() {
        let slots = find_gaps("Kolor: [GAP:1], stan [GAP:2].", 1);
        let indices: Vec<u32> = slots.iter().map(|s| s.gap_index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn build_inputs_skips_unfilled() {
        let text = "Auto z [GAP:1] lakierem i [GAP:2] wnętrzem";
        let inputs = build_inputs(text, &fills(&[(1, "metalicznym")]), 5);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].gap_index, 1);
        assert_eq!(inputs[0].filled_word, "metalicznym");
        assert_eq!(inputs[0].preposition, "z");
        assert!(inputs[0].context.contains("lakierem"));
    }

    #[test]
    fn fill_gaps_keeps_unfilled_markers() {
        let text = "Kolor [GAP:1], stan [GAP:2].";
        let filled = fill_gaps(text, &fills(&[(2, "dobry")]));
        assert_eq!(filled, "Kolor [GAP:1], stan dobry.");
    }

    #[test]
    fn exact_match_rate_counts_case_insensitive_hits() {
        let removed = fills(&[(1, "Czerwony"), (2, "kombi"), (3, "diesel")]);
        let model = fills(&[(1, "czerwony "), (2, "sedan")]);
        assert_eq!(exact_match_rate(&removed, &model), 0.333);
        assert_eq!(exact_match_rate(&BTreeMap::new(), &model), 0.0);
    }

    #[test]
    fn fills_deserialize_from_string_keys() {
        let parsed: BTreeMap<u32, String> =
            serde_json::from_str(r#"{"1": "czerwony", "2": "kombi"}"#).expect("deserialize");
        assert_eq!(parsed[&2], "kombi");
    }
}
