//! Report generation.
//!
//! This module renders analysis results as console text, Markdown
//! documents and JSON.

use crate::models::{
    ConversationReport, FlatRecord, RatingBand, RatingDistribution, ReportMetadata, SummaryReport,
    Theme,
};
use anyhow::Result;
use std::collections::BTreeMap;

/// Generate the console summary printed after an analysis run.
pub fn generate_console_summary(summary: &SummaryReport, top_feedback: &[Theme]) -> String {
    let mut output = String::new();

    output.push_str("\n=== Conversation Summary ===\n");
    output.push_str(&format!("Conversations: {}\n", summary.conversations));
    output.push_str(&format!("Avg Score: {}\n", fmt_optional(summary.avg_score)));
    output.push_str(&format!(
        "Median Score: {}\n",
        fmt_optional(summary.median_score)
    ));

    output.push_str("Sentiment Breakdown:\n");
    for (sentiment, count) in &summary.sentiment_breakdown {
        output.push_str(&format!("  - {}: {}\n", sentiment, count));
    }

    output.push_str(&format!(
        "Followup Required Pct: {}\n",
        fmt_number(summary.followup_required_pct)
    ));
    output.push_str(&format!("Avg Turns: {}\n", fmt_number(summary.avg_turns)));
    output.push_str(&format!("Max Turns: {}\n", summary.max_turns));
    output.push_str(&format!(
        "Completed Pct: {}\n",
        fmt_number(summary.completed_pct)
    ));

    if top_feedback.is_empty() {
        output.push_str("\nNo feedback points available.\n");
    } else {
        output.push_str("\n=== Top Feedback Themes ===\n");
        for theme in top_feedback {
            output.push_str(&format!("- {}: {} mention(s)\n", theme.text, theme.count));
        }
    }

    output
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &ConversationReport) -> String {
    let mut output = String::new();

    output.push_str("# Conversation Feedback Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summary));
    output.push_str(&generate_rating_section(&report.rating_distribution));
    output.push_str(&generate_turns_section(&report.turns_distribution));
    output.push_str(&generate_themes_section(
        "Top Feedback Themes",
        &report.top_feedback,
        "No feedback points available.",
    ));
    output.push_str(&generate_themes_section(
        "Focus Areas",
        &report.focus_areas,
        "No negative conversations with feedback points.",
    ));
    output.push_str(&generate_conversations_section(&report.conversations));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Corpus:** `{}`\n", metadata.corpus_dir));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Date Range:** {}\n", metadata.window));
    section.push_str(&format!("- **Files Loaded:** {}\n", metadata.files_loaded));
    if metadata.conversations_analyzed != metadata.files_loaded {
        section.push_str(&format!(
            "- **Conversations In Range:** {}\n",
            metadata.conversations_analyzed
        ));
    }
    section.push('\n');

    section
}

/// Generate the summary section.
fn generate_summary_section(summary: &SummaryReport) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Metric | Value |\n");
    section.push_str("|:---|:---:|\n");
    section.push_str(&format!("| Conversations | {} |\n", summary.conversations));
    section.push_str(&format!(
        "| Average Score | {} |\n",
        fmt_optional(summary.avg_score)
    ));
    section.push_str(&format!(
        "| Median Score | {} |\n",
        fmt_optional(summary.median_score)
    ));
    section.push_str(&format!(
        "| Follow-up Required | {}% |\n",
        fmt_number(summary.followup_required_pct)
    ));
    section.push_str(&format!(
        "| Completed | {}% |\n",
        fmt_number(summary.completed_pct)
    ));
    section.push_str(&format!(
        "| Average Turns | {} |\n",
        fmt_number(summary.avg_turns)
    ));
    section.push_str(&format!("| Max Turns | {} |\n\n", summary.max_turns));

    if !summary.sentiment_breakdown.is_empty() {
        section.push_str("### Sentiment Breakdown\n\n");
        section.push_str("| Sentiment | Count |\n");
        section.push_str("|:---|:---:|\n");

        for (sentiment, count) in &summary.sentiment_breakdown {
            section.push_str(&format!("| {} | {} |\n", escape_cell(sentiment), count));
        }
        section.push('\n');
    }

    section
}

/// Generate the rating distribution section.
fn generate_rating_section(dist: &RatingDistribution) -> String {
    if dist.total() == 0 {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("### Rating Distribution\n\n");
    section.push_str(&format!(
        "| {} High (9-10) | {} Medium (7-8) | {} Low (0-6) |\n",
        RatingBand::High.emoji(),
        RatingBand::Medium.emoji(),
        RatingBand::Low.emoji(),
    ));
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        dist.get(RatingBand::High),
        dist.get(RatingBand::Medium),
        dist.get(RatingBand::Low)
    ));

    section
}

/// Generate the turns distribution section.
fn generate_turns_section(dist: &BTreeMap<usize, usize>) -> String {
    if dist.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("### Conversation Length\n\n");
    section.push_str("| Turns | Conversations |\n");
    section.push_str("|:---:|:---:|\n");
    for (turns, count) in dist {
        section.push_str(&format!("| {} | {} |\n", turns, count));
    }
    section.push('\n');

    section
}

/// Generate a ranked theme list section.
fn generate_themes_section(title: &str, themes: &[Theme], empty_note: &str) -> String {
    let mut section = format!("## {}\n\n", title);

    if themes.is_empty() {
        section.push_str(empty_note);
        section.push_str("\n\n");
        return section;
    }

    for (i, theme) in themes.iter().enumerate() {
        section.push_str(&format!(
            "{}. {} ({} mention{})\n",
            i + 1,
            escape_cell(&theme.text),
            theme.count,
            if theme.count == 1 { "" } else { "s" }
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-conversation table.
fn generate_conversations_section(records: &[FlatRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Conversations\n\n");
    section.push_str("| File | Saved At | Score | Sentiment | Turns | Follow-up |\n");
    section.push_str("|:---|:---|:---:|:---|:---:|:---:|\n");

    for record in records {
        section.push_str(&format!(
            "| `{}` | {} | {} | {} | {} | {} |\n",
            escape_cell(&record.filename),
            escape_cell(record.saved_at.as_deref().unwrap_or("-")),
            record.score.map(fmt_number).unwrap_or_else(|| "-".to_string()),
            escape_cell(record.sentiment.as_deref().unwrap_or("-")),
            record.total_turns,
            if record.needs_followup() { "yes" } else { "no" }
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by convoscope*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ConversationReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Format a float the way summary tables show it: whole numbers keep one
/// decimal (`9.0`), everything else prints as-is (`7.67`).
pub fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Escape pipes so free text cannot split a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn fmt_optional(value: Option<f64>) -> String {
    value.map(fmt_number).unwrap_or_else(|| "N/A".to_string())
}
