//! CSV export of flattened conversations.
//!
//! One row per conversation, columns in [`FlatRecord`] field order. Absent
//! values are written as empty cells and feedback points are joined into a
//! single cell.

use crate::models::FlatRecord;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Column headers, in output order.
pub const CSV_COLUMNS: [&str; 11] = [
    "filename",
    "saved_at",
    "score",
    "sentiment",
    "requires_followup",
    "conversation_complete",
    "total_turns",
    "initial_transcription",
    "final_transcription",
    "final_response",
    "feedback_points",
];

/// Write records as CSV to any writer.
pub fn write_csv<W: Write>(writer: &mut W, records: &[FlatRecord], delimiter: &str) -> Result<()> {
    writeln!(writer, "{}", CSV_COLUMNS.join(","))?;

    for record in records {
        let row = csv_row(record, delimiter)
            .iter()
            .map(|cell| escape_field(cell))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{}", row)?;
    }

    Ok(())
}

/// Export records to a CSV file.
pub fn export_csv(records: &[FlatRecord], path: &Path, delimiter: &str) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV report at {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write_csv(&mut writer, records, delimiter)
        .with_context(|| format!("Failed to write CSV report to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write CSV report to {}", path.display()))?;

    info!("Exported {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Raw (unescaped) cell values for one record.
fn csv_row(record: &FlatRecord, delimiter: &str) -> [String; 11] {
    [
        record.filename.clone(),
        optional(record.saved_at.as_deref()),
        record.score.map(|s| s.to_string()).unwrap_or_default(),
        optional(record.sentiment.as_deref()),
        record
            .requires_followup
            .map(|b| b.to_string())
            .unwrap_or_default(),
        record
            .conversation_complete
            .map(|b| b.to_string())
            .unwrap_or_default(),
        record.total_turns.to_string(),
        optional(record.initial_transcription.as_deref()),
        optional(record.final_transcription.as_deref()),
        optional(record.final_response.as_deref()),
        record.feedback_points.join(delimiter),
    ]
}

fn optional(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Quote a field if it contains a comma, quote, or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
