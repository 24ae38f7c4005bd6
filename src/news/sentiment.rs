use serde::Serialize;

const POSITIVE: &[&str] = &[
    "gain", "gains", "surge", "rally", "bull", "bullish", "beats", "pump", "soars", "up", "record",
];

const NEGATIVE: &[&str] = &[
    "drop", "drops", "crash", "crashes", "slump", "plunge", "bear", "bearish", "falls", "down",
    "dip",
];

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Keyword tally over the lowercased headline. Keywords match as substrings,
/// so "bullish" counts for both "bull" and "bullish".
pub fn sentiment(title: &str) -> Sentiment {
    let title = title.to_lowercase();
    let hits = |words: &[&str]| words.iter().filter(|w| title.contains(**w)).count() as i64;

    match hits(POSITIVE) - hits(NEGATIVE) {
        score if score > 0 => Sentiment::Positive,
        score if score < 0 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}
