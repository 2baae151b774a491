//! Relevance ranking of merged items.

use super::MergedItem;

/// Score for a title equal to the keyword.
pub const EXACT_MATCH_SCORE: i64 = 100;
/// Score for a title starting with the keyword.
pub const PREFIX_MATCH_SCORE: i64 = 80;
/// Base score for a title containing the keyword further in; the character
/// offset of the first occurrence is subtracted from it.
pub const CONTAINS_MATCH_BASE: i64 = 60;
/// Score for a title not containing the keyword.
pub const NO_MATCH_SCORE: i64 = 0;

/// How well `title` matches `keyword`, both compared trimmed and lower-cased.
///
/// | match                   | score          |
/// |-------------------------|----------------|
/// | exact                   | 100            |
/// | prefix                  | 80             |
/// | contains at char `i`    | 60 - i         |
/// | none                    | 0              |
///
/// Late occurrences in long titles can score zero or below.
pub fn relevance_score(title: &str, keyword: &str) -> i64 {
    let title = title.trim().to_lowercase();
    let keyword = keyword.trim().to_lowercase();

    if title == keyword {
        return EXACT_MATCH_SCORE;
    }

    if title.starts_with(&keyword) {
        return PREFIX_MATCH_SCORE;
    }

    match title.find(&keyword) {
        Some(byte_idx) => CONTAINS_MATCH_BASE - title[..byte_idx].chars().count() as i64,
        None => NO_MATCH_SCORE,
    }
}

/// Order items by relevance to `keyword`.
///
/// Priority:
/// 1. Higher score
/// 2. More contributing sources
/// 3. Shorter title (in characters)
/// 4. Title, lexicographically
///
/// Merged titles are unique, so the order is total and identical across runs
/// regardless of input order.
pub fn rank(items: Vec<MergedItem>, keyword: &str) -> Vec<MergedItem> {
    let mut scored: Vec<(i64, usize, MergedItem)> = items
        .into_iter()
        .map(|item| {
            let score = relevance_score(&item.title, keyword);
            let title_len = item.title.chars().count();
            (score, title_len, item)
        })
        .collect();

    scored.sort_by(|(score_a, len_a, a), (score_b, len_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| b.sources.len().cmp(&a.sources.len()))
            .then_with(|| len_a.cmp(len_b))
            .then_with(|| a.title.cmp(&b.title))
    });

    scored.into_iter().map(|(_, _, item)| item).collect()
}
