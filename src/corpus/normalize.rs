//! Projection of raw conversation documents into [`FlatRecord`]s.
//!
//! Saved conversations come from an external capture tool and carry no
//! schema guarantee, so every field is pulled out of a [`serde_json::Value`]
//! leniently: a missing key or a value of the wrong type becomes `None`.
//! Each fallback chain lives in its own function so the precedence order can
//! be tested on its own.

use serde_json::{Map, Value};

use crate::error::AnalysisError;
use crate::models::FlatRecord;

const FINAL_ANALYSIS_KEY: &str = "final_analysis";

/// Parses raw file content and normalizes it into a [`FlatRecord`].
///
/// # Errors
///
/// Returns [`AnalysisError::MalformedInput`] if the content is not valid
/// JSON or is not a JSON object.
pub fn parse_record(content: &str, filename: &str) -> Result<FlatRecord, AnalysisError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| AnalysisError::MalformedInput {
            filename: filename.to_string(),
            reason: e.to_string(),
        })?;

    normalize_record(&value, filename)
}

/// Normalizes an already-parsed document into a [`FlatRecord`].
///
/// # Errors
///
/// Returns [`AnalysisError::MalformedInput`] if `raw` is not a JSON object.
pub fn normalize_record(raw: &Value, filename: &str) -> Result<FlatRecord, AnalysisError> {
    let data = raw
        .as_object()
        .ok_or_else(|| AnalysisError::MalformedInput {
            filename: filename.to_string(),
            reason: format!("expected a JSON object, found {}", value_kind(raw)),
        })?;

    let final_analysis = final_analysis(data);

    Ok(FlatRecord {
        filename: filename.to_string(),
        saved_at: string_field(data, "saved_at"),
        score: data.get("score").and_then(Value::as_f64),
        sentiment: resolve_sentiment(data, final_analysis),
        requires_followup: final_analysis.and_then(|fa| bool_field(fa, "requiresFollowUp")),
        conversation_complete: final_analysis
            .and_then(|fa| bool_field(fa, "conversationComplete")),
        total_turns: count_turns(data),
        initial_transcription: string_field(data, "initial_transcription"),
        final_transcription: final_analysis.and_then(|fa| string_field(fa, "transcription")),
        final_response: final_analysis
            .and_then(|fa| string_field(fa, "conversationalResponse")),
        feedback_points: resolve_feedback_points(data),
    })
}

/// Top-level `sentiment`, falling back to `final_analysis.sentiment`.
///
/// Empty strings count as absent on both levels.
pub fn resolve_sentiment(
    data: &Map<String, Value>,
    final_analysis: Option<&Map<String, Value>>,
) -> Option<String> {
    non_empty_string(data, "sentiment")
        .or_else(|| final_analysis.and_then(|fa| non_empty_string(fa, "sentiment")))
}

/// `initial_feedback_points`, falling back to `initial_feedback`.
///
/// The first source holding at least one string wins outright; the two
/// sources are never merged.
pub fn resolve_feedback_points(data: &Map<String, Value>) -> Vec<String> {
    ["initial_feedback_points", "initial_feedback"]
        .iter()
        .map(|key| string_list(data, key))
        .find(|points| !points.is_empty())
        .unwrap_or_default()
}

/// Length of the `turns` sequence, 0 when absent or not a sequence.
pub fn count_turns(data: &Map<String, Value>) -> usize {
    data.get("turns")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

fn final_analysis(data: &Map<String, Value>) -> Option<&Map<String, Value>> {
    data.get(FINAL_ANALYSIS_KEY).and_then(Value::as_object)
}

fn string_field(data: &Map<String, Value>, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(str::to_string)
}

fn non_empty_string(data: &Map<String, Value>, key: &str) -> Option<String> {
    string_field(data, key).filter(|s| !s.is_empty())
}

fn bool_field(data: &Map<String, Value>, key: &str) -> Option<bool> {
    data.get(key).and_then(Value::as_bool)
}

fn string_list(data: &Map<String, Value>, key: &str) -> Vec<String> {
    match data.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
