//! Date window filtering on `saved_at`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::models::FlatRecord;

/// Inclusive range of calendar dates (UTC) to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { since, until }
    }

    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    /// Whether a date falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since.map_or(true, |since| date >= since)
            && self.until.map_or(true, |until| date <= until)
    }

    /// Keep the records saved inside the window, preserving order.
    ///
    /// An unbounded window keeps everything. Otherwise records without a
    /// parseable `saved_at` are dropped.
    pub fn apply(&self, records: Vec<FlatRecord>) -> Vec<FlatRecord> {
        if self.is_unbounded() {
            return records;
        }

        records
            .into_iter()
            .filter(|record| match record.saved_at.as_deref().and_then(parse_saved_at) {
                Some(saved) => self.contains(saved.date_naive()),
                None => {
                    debug!("Dropping {}: no usable saved_at", record.filename);
                    false
                }
            })
            .collect()
    }

    /// Human-readable label, e.g. `2025-03-01 → 2025-03-31`.
    pub fn label(&self) -> String {
        match (self.since, self.until) {
            (None, None) => "All time".to_string(),
            (Some(since), None) => format!("Since {}", since),
            (None, Some(until)) => format!("Until {}", until),
            (Some(since), Some(until)) => format!("{} → {}", since, until),
        }
    }
}

/// Parse a saved timestamp into UTC.
///
/// Accepts RFC 3339, the capture tool's `+00:00Z` double suffix, and naive
/// timestamps (read as UTC).
pub fn parse_saved_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(stripped) = raw.strip_suffix('Z') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(stripped) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = stripped.parse::<NaiveDateTime>() {
            return Some(naive.and_utc());
        }
    }

    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}
