//! Parsers for the two free-text reply shapes

use crate::io::configuration::MAX_SCORE;
use regex::Regex;
use std::sync::LazyLock;

// "9/10", "9.5/10", "9.5 / 10"; the first occurrence wins
static SCORE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*/\s*10").ok());

/// Keep the names from a comma-separated reply that are real candidates
///
/// Entries are trimmed (including stray quotes and backticks); unknown names
/// are dropped, repeats are kept once, and reply order is preserved.
pub fn parse_filename_list(reply: &str, candidates: &[String]) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();

    for raw in reply.split([',', '\n']) {
        let name = raw.trim().trim_matches(|c: char| matches!(c, '"' | '\'' | '`')).trim();
        if name.is_empty() {
            continue;
        }
        if candidates.iter().any(|c| c == name) && !selected.iter().any(|s| s == name) {
            selected.push(name.to_string());
        }
    }

    selected
}

/// Extract the numeric impact score from a scoring reply
///
/// Returns 0 when no `<number>/10` appears; values are clamped to 0..=10.
pub fn parse_impact_score(reply: &str) -> f64 {
    SCORE_PATTERN
        .as_ref()
        .and_then(|pattern| pattern.captures(reply))
        .and_then(|captures| captures.get(1))
        .and_then(|number| number.as_str().parse::<f64>().ok())
        .map_or(0.0, |score| score.clamp(0.0, MAX_SCORE))
}
