//! Data models for the conversation analyzer.
//!
//! This module contains the flattened conversation record, the summary
//! statistics computed over a corpus, and the report document that ties
//! them together for rendering.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One saved conversation, projected into a fixed shape.
///
/// Optional fields are `None` when the source document lacks them or holds
/// a value of the wrong type. `total_turns` and `feedback_points` are always
/// present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// File name within the conversation directory.
    pub filename: String,
    /// ISO-8601 timestamp the conversation was saved at.
    pub saved_at: Option<String>,
    /// Satisfaction rating, conventionally 0-10.
    pub score: Option<f64>,
    /// Top-level sentiment, or the final analysis sentiment.
    pub sentiment: Option<String>,
    pub requires_followup: Option<bool>,
    pub conversation_complete: Option<bool>,
    /// Number of follow-up turns.
    pub total_turns: usize,
    pub initial_transcription: Option<String>,
    pub final_transcription: Option<String>,
    pub final_response: Option<String>,
    /// Feedback points in source order.
    pub feedback_points: Vec<String>,
}

impl FlatRecord {
    /// Creates a record with every optional field absent.
    #[allow(dead_code)] // Builder utility for tests and fixtures
    pub fn empty(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            saved_at: None,
            score: None,
            sentiment: None,
            requires_followup: None,
            conversation_complete: None,
            total_turns: 0,
            initial_transcription: None,
            final_transcription: None,
            final_response: None,
            feedback_points: Vec::new(),
        }
    }

    /// Whether follow-up was flagged; absent counts as `false`.
    pub fn needs_followup(&self) -> bool {
        self.requires_followup.unwrap_or(false)
    }

    /// Whether the conversation completed; absent counts as `false`.
    pub fn is_complete(&self) -> bool {
        self.conversation_complete.unwrap_or(false)
    }
}

/// Summary statistics over a corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Total number of conversations.
    pub conversations: usize,
    /// Mean of present scores, rounded to 2 decimals.
    pub avg_score: Option<f64>,
    /// Median of present scores, unrounded.
    pub median_score: Option<f64>,
    /// Sentiment label to occurrence count, most frequent first.
    pub sentiment_breakdown: IndexMap<String, usize>,
    /// Share of conversations flagged for follow-up, in percent.
    pub followup_required_pct: f64,
    pub avg_turns: f64,
    pub max_turns: usize,
    /// Share of completed conversations, in percent.
    pub completed_pct: f64,
}

/// A recurring feedback point and how often it was mentioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub text: String,
    pub count: usize,
}

impl Theme {
    pub fn new(text: impl Into<String>, count: usize) -> Self {
        Self {
            text: text.into(),
            count,
        }
    }
}

/// Coarse satisfaction band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingBand {
    /// Scores below 7
    Low,
    /// Scores from 7 up to 9
    Medium,
    /// Scores of 9 and above
    High,
}

impl RatingBand {
    /// Classifies a score.
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            RatingBand::High
        } else if score >= 7.0 {
            RatingBand::Medium
        } else {
            RatingBand::Low
        }
    }

    /// Returns an emoji representation of the band.
    pub fn emoji(&self) -> &'static str {
        match self {
            RatingBand::Low => "🔴",
            RatingBand::Medium => "🟡",
            RatingBand::High => "🟢",
        }
    }
}

impl fmt::Display for RatingBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingBand::Low => write!(f, "Low"),
            RatingBand::Medium => write!(f, "Medium"),
            RatingBand::High => write!(f, "High"),
        }
    }
}

/// Count of scored conversations per rating band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl RatingDistribution {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }

    pub fn get(&self, band: RatingBand) -> usize {
        match band {
            RatingBand::High => self.high,
            RatingBand::Medium => self.medium,
            RatingBand::Low => self.low,
        }
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Directory the conversations were loaded from.
    pub corpus_dir: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Human-readable label for the date window applied, if any.
    pub window: String,
    /// Conversations loaded before the date window was applied.
    pub files_loaded: usize,
    /// Conversations left after the date window.
    pub conversations_analyzed: usize,
}

/// The complete analysis of one corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationReport {
    pub metadata: ReportMetadata,
    pub summary: SummaryReport,
    /// Most frequent feedback points across all conversations.
    pub top_feedback: Vec<Theme>,
    /// Most frequent feedback points among negative conversations.
    pub focus_areas: Vec<Theme>,
    pub rating_distribution: RatingDistribution,
    /// Turn count to number of conversations with that many turns.
    pub turns_distribution: BTreeMap<usize, usize>,
    /// Every analyzed conversation, in filename order.
    pub conversations: Vec<FlatRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_band_boundaries() {
        assert_eq!(RatingBand::from_score(10.0), RatingBand::High);
        assert_eq!(RatingBand::from_score(9.0), RatingBand::High);
        assert_eq!(RatingBand::from_score(8.5), RatingBand::Medium);
        assert_eq!(RatingBand::from_score(7.0), RatingBand::Medium);
        assert_eq!(RatingBand::from_score(6.9), RatingBand::Low);
        assert_eq!(RatingBand::from_score(0.0), RatingBand::Low);
    }

    #[test]
    fn test_rating_band_ordering() {
        assert!(RatingBand::Low < RatingBand::Medium);
        assert!(RatingBand::Medium < RatingBand::High);
    }

    #[test]
    fn test_absent_flags_count_as_false() {
        let mut record = FlatRecord::empty("a.json");
        assert!(!record.needs_followup());
        assert!(!record.is_complete());

        record.requires_followup = Some(true);
        record.conversation_complete = Some(false);
        assert!(record.needs_followup());
        assert!(!record.is_complete());
    }

    #[test]
    fn test_flat_record_serializes_absent_as_null() {
        let record = FlatRecord::empty("a.json");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["score"].is_null());
        assert_eq!(json["total_turns"], 0);
        assert_eq!(json["feedback_points"], serde_json::json!([]));
    }
}
