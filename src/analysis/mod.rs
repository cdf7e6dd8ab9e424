//! Analysis modules.
//!
//! Aggregation and theme ranking each consume the same loaded corpus
//! independently; [`analyze`] runs both and assembles the report.

pub mod aggregator;
pub mod themes;
pub mod window;

pub use aggregator::*;
pub use themes::*;
pub use window::*;

use chrono::Utc;
use tracing::info;

use crate::error::AnalysisError;
use crate::models::{ConversationReport, FlatRecord, ReportMetadata};

/// Settings for one analysis pass.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Number of top feedback themes to keep.
    pub top_n: usize,
    /// Number of focus areas to keep.
    pub focus_top_n: usize,
    /// Sentiments that mark a conversation as negative.
    pub negative_sentiments: Vec<String>,
    pub window: DateWindow,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_n: 5,
            focus_top_n: 3,
            negative_sentiments: ["Negative", "Frustrated", "Disappointed", "Angry"]
                .into_iter()
                .map(String::from)
                .collect(),
            window: DateWindow::default(),
        }
    }
}

/// Run the full analysis over a loaded corpus.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyInput`] if the date window leaves no
/// conversations.
pub fn analyze(
    records: Vec<FlatRecord>,
    corpus_dir: &str,
    options: &AnalysisOptions,
) -> Result<ConversationReport, AnalysisError> {
    let files_loaded = records.len();
    let records = options.window.apply(records);

    if !options.window.is_unbounded() {
        info!(
            "Date window {} kept {} of {} conversations",
            options.window.label(),
            records.len(),
            files_loaded
        );
    }

    let summary = summarize(&records)?;

    Ok(ConversationReport {
        metadata: ReportMetadata {
            corpus_dir: corpus_dir.to_string(),
            generated_at: Utc::now(),
            window: options.window.label(),
            files_loaded,
            conversations_analyzed: records.len(),
        },
        summary,
        top_feedback: rank_themes(&records, options.top_n),
        focus_areas: focus_areas(&records, &options.negative_sentiments, options.focus_top_n),
        rating_distribution: rating_distribution(&records),
        turns_distribution: turns_distribution(&records),
        conversations: records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::load_corpus;
    use crate::models::Theme;
    use chrono::NaiveDate;
    use std::path::Path;

    fn fixture_records() -> Vec<FlatRecord> {
        load_corpus(Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/conversations"))
            .unwrap()
    }

    #[test]
    fn test_analyze_fixture_corpus() {
        let report = analyze(fixture_records(), "fixtures", &AnalysisOptions::default()).unwrap();

        let summary = &report.summary;
        assert_eq!(summary.conversations, 4);
        // 9, 4, 10 scored; last record has no score
        assert_eq!(summary.avg_score, Some(7.67));
        assert_eq!(summary.median_score, Some(9.0));
        assert_eq!(summary.followup_required_pct, 25.0);
        assert_eq!(summary.completed_pct, 50.0);
        assert_eq!(summary.avg_turns, 0.75);
        assert_eq!(summary.max_turns, 2);
        assert_eq!(summary.sentiment_breakdown.len(), 3);
        assert_eq!(summary.sentiment_breakdown.get("Frustrated"), Some(&1));

        assert_eq!(report.top_feedback[0], Theme::new("Fast shipping", 2));
        assert_eq!(report.top_feedback.len(), 5);
        assert_eq!(
            report.focus_areas,
            vec![Theme::new("Slow checkout", 1), Theme::new("Fast shipping", 1)]
        );

        assert_eq!(report.rating_distribution.high, 2);
        assert_eq!(report.rating_distribution.low, 1);
        assert_eq!(report.turns_distribution.get(&0), Some(&2));
        assert_eq!(report.metadata.window, "All time");
        assert_eq!(report.conversations.len(), 4);
    }

    #[test]
    fn test_window_that_empties_corpus() {
        let options = AnalysisOptions {
            window: DateWindow::new(NaiveDate::from_ymd_opt(2030, 1, 1), None),
            ..AnalysisOptions::default()
        };

        let err = analyze(fixture_records(), "fixtures", &options).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));
    }

    #[test]
    fn test_window_narrows_corpus() {
        let options = AnalysisOptions {
            window: DateWindow::new(
                NaiveDate::from_ymd_opt(2025, 3, 2),
                NaiveDate::from_ymd_opt(2025, 3, 10),
            ),
            ..AnalysisOptions::default()
        };

        let report = analyze(fixture_records(), "fixtures", &options).unwrap();
        assert_eq!(report.metadata.files_loaded, 4);
        assert_eq!(report.metadata.conversations_analyzed, 3);
        assert_eq!(report.summary.avg_score, Some(7.0));
    }
}
