//! Ranking of recurring feedback points.

use crate::models::{FlatRecord, Theme};
use indexmap::IndexMap;

/// Return the `top_n` most frequent feedback points across `records`.
///
/// Points are trimmed and empty ones dropped; matching is exact and
/// case-sensitive. Equal counts keep first-seen order, so the result depends
/// on the order of `records`.
pub fn rank_themes(records: &[FlatRecord], top_n: usize) -> Vec<Theme> {
    rank_points(records.iter().flat_map(|r| r.feedback_points.iter()), top_n)
}

/// Rank feedback points of conversations whose sentiment is in `sentiments`.
///
/// Sentiment matching ignores ASCII case. Conversations without a sentiment
/// never qualify.
pub fn focus_areas(records: &[FlatRecord], sentiments: &[String], top_n: usize) -> Vec<Theme> {
    let negative = records.iter().filter(|r| {
        r.sentiment
            .as_deref()
            .is_some_and(|s| sentiments.iter().any(|n| n.eq_ignore_ascii_case(s)))
    });

    rank_points(negative.flat_map(|r| r.feedback_points.iter()), top_n)
}

fn rank_points<'a>(points: impl Iterator<Item = &'a String>, top_n: usize) -> Vec<Theme> {
    if top_n == 0 {
        return Vec::new();
    }

    let mut tally: IndexMap<&str, usize> = IndexMap::new();
    for point in points.map(|p| p.trim()).filter(|p| !p.is_empty()) {
        *tally.entry(point).or_default() += 1;
    }

    // stable: ties stay in first-seen order
    let mut ranked: Vec<(&str, usize)> = tally.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top_n);

    ranked
        .into_iter()
        .map(|(text, count)| Theme::new(text, count))
        .collect()
}
