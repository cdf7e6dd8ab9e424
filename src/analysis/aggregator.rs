//! Summary statistics over a loaded corpus.
//!
//! Scores are averaged only over conversations that carry one. Follow-up and
//! completion flags count a missing value as `false`, so those percentages
//! always use the full corpus as denominator.

use crate::error::AnalysisError;
use crate::models::{FlatRecord, RatingBand, RatingDistribution, SummaryReport};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Compute the summary report for a set of conversations.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyInput`] if `records` is empty.
pub fn summarize(records: &[FlatRecord]) -> Result<SummaryReport, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let total = records.len();
    let scores = present_scores(records);
    let turns: Vec<f64> = records.iter().map(|r| r.total_turns as f64).collect();

    let followups = records.iter().filter(|r| r.needs_followup()).count();
    let completed = records.iter().filter(|r| r.is_complete()).count();

    Ok(SummaryReport {
        conversations: total,
        avg_score: mean(&scores).map(round2),
        median_score: median(&scores),
        sentiment_breakdown: sentiment_breakdown(records),
        followup_required_pct: percentage(followups, total),
        avg_turns: mean(&turns).map(round2).unwrap_or(0.0),
        max_turns: records.iter().map(|r| r.total_turns).max().unwrap_or(0),
        completed_pct: percentage(completed, total),
    })
}

/// Scores of the conversations that have one, in corpus order.
pub fn present_scores(records: &[FlatRecord]) -> Vec<f64> {
    records.iter().filter_map(|r| r.score).collect()
}

/// Count each distinct sentiment, most frequent first.
///
/// Conversations without a sentiment are left out entirely. Equal counts
/// keep the order in which the sentiment was first seen.
pub fn sentiment_breakdown(records: &[FlatRecord]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for sentiment in records.iter().filter_map(|r| r.sentiment.as_deref()) {
        *counts.entry(sentiment.to_string()).or_default() += 1;
    }

    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
}

/// Count scored conversations per rating band.
pub fn rating_distribution(records: &[FlatRecord]) -> RatingDistribution {
    let mut dist = RatingDistribution::default();

    for score in present_scores(records) {
        match RatingBand::from_score(score) {
            RatingBand::High => dist.high += 1,
            RatingBand::Medium => dist.medium += 1,
            RatingBand::Low => dist.low += 1,
        }
    }

    dist
}

/// Number of conversations per turn count, ascending by turn count.
pub fn turns_distribution(records: &[FlatRecord]) -> BTreeMap<usize, usize> {
    let mut dist = BTreeMap::new();

    for record in records {
        *dist.entry(record.total_turns).or_default() += 1;
    }

    dist
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median, averaging the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// `count` as a percentage of `total`, rounded to 2 decimals.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(100.0 * count as f64 / total as f64)
}

/// Round to 2 decimal places, exact halves to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> FlatRecord {
        FlatRecord::empty(name)
    }

    fn scored(name: &str, score: Option<f64>) -> FlatRecord {
        FlatRecord {
            score,
            ..record(name)
        }
    }

    fn with_sentiment(name: &str, sentiment: Option<&str>) -> FlatRecord {
        FlatRecord {
            sentiment: sentiment.map(str::to_string),
            ..record(name)
        }
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = summarize(&[]).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));
    }

    #[test]
    fn test_absent_scores_excluded_from_mean() {
        let records = vec![
            scored("a.json", Some(8.0)),
            scored("b.json", Some(10.0)),
            scored("c.json", None),
        ];

        let summary = summarize(&records).unwrap();
        assert_eq!(summary.conversations, 3);
        assert_eq!(summary.avg_score, Some(9.0));
        assert_eq!(summary.median_score, Some(9.0));
    }

    #[test]
    fn test_mean_is_rounded_median_is_not() {
        let records = vec![
            scored("a.json", Some(7.0)),
            scored("b.json", Some(8.0)),
            scored("c.json", Some(8.0)),
            scored("d.json", Some(6.0)),
            scored("e.json", Some(9.0)),
            scored("f.json", Some(10.0)),
        ];

        let summary = summarize(&records).unwrap();
        // 48 / 6 = 8.0; median of 6,7,8,8,9,10 = 8.0
        assert_eq!(summary.avg_score, Some(8.0));
        assert_eq!(summary.median_score, Some(8.0));

        let records = vec![
            scored("a.json", Some(7.0)),
            scored("b.json", Some(8.0)),
            scored("c.json", Some(8.0)),
        ];
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.avg_score, Some(7.67));

        let records = vec![scored("a.json", Some(7.0)), scored("b.json", Some(8.0))];
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.median_score, Some(7.5));
    }

    #[test]
    fn test_no_scores_at_all() {
        let summary = summarize(&[record("a.json"), record("b.json")]).unwrap();
        assert_eq!(summary.avg_score, None);
        assert_eq!(summary.median_score, None);
    }

    #[test]
    fn test_absent_followup_counts_as_false() {
        let records = vec![
            FlatRecord {
                requires_followup: Some(true),
                ..record("a.json")
            },
            record("b.json"),
        ];

        let summary = summarize(&records).unwrap();
        assert_eq!(summary.followup_required_pct, 50.0);
    }

    #[test]
    fn test_completed_pct_rounding() {
        let records = vec![
            FlatRecord {
                conversation_complete: Some(true),
                ..record("a.json")
            },
            FlatRecord {
                conversation_complete: Some(false),
                ..record("b.json")
            },
            record("c.json"),
        ];

        let summary = summarize(&records).unwrap();
        assert_eq!(summary.completed_pct, 33.33);
        assert_eq!(summary.followup_required_pct, 0.0);
    }

    #[test]
    fn test_turn_statistics() {
        let records = vec![
            FlatRecord {
                total_turns: 3,
                ..record("a.json")
            },
            FlatRecord {
                total_turns: 1,
                ..record("b.json")
            },
            record("c.json"),
        ];

        let summary = summarize(&records).unwrap();
        assert_eq!(summary.avg_turns, 1.33);
        assert_eq!(summary.max_turns, 3);

        let dist = turns_distribution(&records);
        assert_eq!(
            dist.into_iter().collect::<Vec<_>>(),
            vec![(0, 1), (1, 1), (3, 1)]
        );
    }

    #[test]
    fn test_sentiment_breakdown_excludes_absent() {
        let records = vec![
            with_sentiment("a.json", Some("Neutral")),
            with_sentiment("b.json", Some("Happy")),
            with_sentiment("c.json", None),
            with_sentiment("d.json", Some("Happy")),
        ];

        let breakdown = sentiment_breakdown(&records);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown.get("Happy"), Some(&2));
        assert_eq!(breakdown.get("Neutral"), Some(&1));

        let order: Vec<_> = breakdown.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["Happy", "Neutral"]);
    }

    #[test]
    fn test_rating_distribution_skips_unscored() {
        let records = vec![
            scored("a.json", Some(10.0)),
            scored("b.json", Some(9.0)),
            scored("c.json", Some(7.0)),
            scored("d.json", Some(2.0)),
            scored("e.json", None),
        ];

        let dist = rating_distribution(&records);
        assert_eq!(dist.high, 2);
        assert_eq!(dist.medium, 1);
        assert_eq!(dist.low, 1);
        assert_eq!(dist.total(), 4);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(9.0), 9.0);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(1.004), 1.0);
        assert_eq!(round2(9.0 / 8.0), 1.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_half_cent_means_round_to_even() {
        let mut records: Vec<FlatRecord> = (0..7)
            .map(|i| FlatRecord {
                score: Some(8.0),
                total_turns: 1,
                ..record(&format!("{i}.json"))
            })
            .collect();
        records.push(FlatRecord {
            score: Some(9.0),
            total_turns: 2,
            ..record("7.json")
        });

        let summary = summarize(&records).unwrap();
        // 9 / 8 = 1.125 and 65 / 8 = 8.125
        assert_eq!(summary.avg_turns, 1.12);
        assert_eq!(summary.avg_score, Some(8.12));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }
}
