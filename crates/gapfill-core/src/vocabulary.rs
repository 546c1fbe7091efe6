//! Static lookup tables: vehicle-domain vocabulary and Polish case tables.
//!
//! Everything here is `'static` and read-only, so the scorers can share it
//! across threads without any synchronization.

use serde::{Deserialize, Serialize};

/// Vocabulary category of the vehicle domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabCategory {
    Colors,
    Conditions,
    Engines,
    FuelTypes,
    Transmissions,
    BodyTypes,
    DriveTypes,
    Features,
}

/// Known-good lowercase words per category.
pub const CAR_VOCABULARY: &[(VocabCategory, &[&str])] = &[
    (
        VocabCategory::Colors,
        &[
            "biały",
            "czarny",
            "srebrny",
            "szary",
            "czerwony",
            "niebieski",
            "zielony",
            "żółty",
            "brązowy",
            "bordowy",
            "kremowy",
            "beżowy",
            "metaliczny",
        ],
    ),
    (
        VocabCategory::Conditions,
        &[
            "zadbany",
            "doskonały",
            "bardzo dobry",
            "dobry",
            "zadowalający",
            "porządny",
            "słaby",
            "zły",
            "nowy",
            "stary",
            "piękny",
            "elegancki",
        ],
    ),
    (
        VocabCategory::Engines,
        &[
            "benzynowy",
            "dieselowy",
            "hybrydowy",
            "elektryczny",
            "lpg",
            "cng",
            "benzynowo-gazowy",
            "benzyna",
            "diesel",
            "paliwo",
        ],
    ),
    (
        VocabCategory::FuelTypes,
        &["benzyna", "diesel", "gaz", "hybryda", "elektryczny", "lpg"],
    ),
    (
        VocabCategory::Transmissions,
        &[
            "manualna",
            "automatyczna",
            "semi-automatyczna",
            "cvt",
            "powershift",
        ],
    ),
    (
        VocabCategory::BodyTypes,
        &[
            "sedan",
            "kombi",
            "suv",
            "crossover",
            "coupe",
            "cabrio",
            "hatchback",
            "van",
            "mpv",
        ],
    ),
    (
        VocabCategory::DriveTypes,
        &["przedni", "tylny", "pełny", "stały", "awd", "fwd", "rwd"],
    ),
    (
        VocabCategory::Features,
        &[
            "klimatyzacja",
            "nawigacja",
            "podgrzewane",
            "elektrycze",
            "asystent",
            "czujnik",
            "hamulce",
            "abs",
            "esp",
            "airbag",
            "airbagi",
            "tempomat",
            "cruise control",
            "kamera cofania",
            "czujniki parkowania",
        ],
    ),
];

/// Context keywords that anchor a text in the vehicle domain.
pub const DOMAIN_ANCHORS: &[&str] = &[
    "samochód",
    "auto",
    "pojazd",
    "silnik",
    "lakier",
    "przebieg",
    "rocznik",
];

/// Iterate every vocabulary word with its category.
pub fn vocabulary_words() -> impl Iterator<Item = (VocabCategory, &'static str)> {
    CAR_VOCABULARY
        .iter()
        .flat_map(|(category, words)| words.iter().map(move |w| (*category, *w)))
}

/// First category containing `word` exactly (case-insensitive, trimmed).
pub fn category_of(word: &str) -> Option<VocabCategory> {
    let needle = word.trim().to_lowercase();
    vocabulary_words()
        .find(|(_, w)| *w == needle)
        .map(|(category, _)| category)
}

/// Grammatical case approximated by adjective endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammaticalCase {
    Nominative,
    Accusative,
    Genitive,
    Dative,
    Instrumental,
    Locative,
}

impl GrammaticalCase {
    /// Word-final substrings taken as evidence of this case.
    ///
    /// Several cases share endings (instrumental and locative are identical),
    /// so the suffix check alone cannot tell them apart.
    pub fn endings(self) -> &'static [&'static str] {
        match self {
            Self::Nominative | Self::Accusative => &["y", "i", "owy", "ny"],
            Self::Genitive => &["ego", "ogo"],
            Self::Dative => &["emu"],
            Self::Instrumental | Self::Locative => &["ym", "ymi"],
        }
    }

    /// Case governed by `preposition` (trimmed, case-insensitive).
    ///
    /// Empty or unrecognized prepositions fall back to nominative.
    pub fn for_preposition(preposition: &str) -> Self {
        let key = preposition.trim().to_lowercase();
        PREPOSITION_CASES
            .iter()
            .find(|(p, _)| *p == key)
            .map(|(_, case)| *case)
            .unwrap_or(Self::Nominative)
    }
}

/// Preposition → governed case.
pub const PREPOSITION_CASES: &[(&str, GrammaticalCase)] = &[
    ("z", GrammaticalCase::Instrumental),
    ("ze", GrammaticalCase::Instrumental),
    ("w", GrammaticalCase::Locative),
    ("we", GrammaticalCase::Locative),
    ("na", GrammaticalCase::Locative),
    ("o", GrammaticalCase::Locative),
    ("od", GrammaticalCase::Genitive),
    ("do", GrammaticalCase::Genitive),
    ("dla", GrammaticalCase::Genitive),
    ("u", GrammaticalCase::Genitive),
];

/// Whether `token` is a preposition known to the case table.
pub fn is_known_preposition(token: &str) -> bool {
    let key = token.trim().to_lowercase();
    PREPOSITION_CASES.iter().any(|(p, _)| *p == key)
}

/// Vowels used by the semantic plausibility check.
pub const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y', 'ą', 'ę', 'ó'];

/// Polish diacritic letters (lowercase).
pub const POLISH_DIACRITICS: &[char] = &['ą', 'ć', 'ę', 'ł', 'ń', 'ó', 'ś', 'ź', 'ż'];

/// Common derivational suffixes.
pub const COMMON_SUFFIXES: &[&str] = &["ski", "owy", "ny"];
