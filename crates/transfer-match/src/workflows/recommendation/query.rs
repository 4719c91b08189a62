//! Free-text query relevance, used only in weighted search mode.

use super::domain::College;

/// Queries shorter than this are not actively scored.
pub(crate) const MIN_QUERY_LEN: usize = 2;

const NOT_SCORED: u8 = 50;
const NO_TOKENS_MATCHED: u8 = 20;

/// Banded relevance of a candidate against a free-text query. Whole-query
/// hits in the name or a program dominate; otherwise the score follows what
/// fraction of the query tokens appear anywhere in the name or programs.
pub fn query_match_score(college: &College, query: &str) -> u8 {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return NOT_SCORED;
    }

    let needle = trimmed.to_ascii_lowercase();
    let name = college.name.to_ascii_lowercase();
    if name.contains(&needle) {
        return 100;
    }

    let programs: Vec<String> = college
        .programs
        .iter()
        .map(|program| program.to_ascii_lowercase())
        .collect();
    if programs.iter().any(|program| program.contains(&needle)) {
        return 90;
    }

    let tokens: Vec<&str> = needle.split_whitespace().collect();
    let matched = tokens
        .iter()
        .filter(|token| {
            name.contains(*token) || programs.iter().any(|program| program.contains(*token))
        })
        .count();

    if matched == 0 {
        return NO_TOKENS_MATCHED;
    }

    let coverage = matched as f64 / tokens.len() as f64;
    if coverage >= 1.0 {
        85
    } else if coverage >= 0.75 {
        75
    } else if coverage >= 0.5 {
        65
    } else {
        55
    }
}
