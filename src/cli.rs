//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use clap::Parser;
use std::path::PathBuf;

/// Convoscope - summaries and recurring themes for saved feedback conversations
///
/// Reads a directory of saved conversation JSON files, prints summary
/// metrics and the most common feedback themes, and exports one CSV row
/// per conversation.
///
/// Examples:
///   convoscope --dir conversations
///   convoscope --dir conversations --top-n 10 --output report.csv
///   convoscope --since 2025-03-01 --until 2025-03-31 --report march.md
///   convoscope --dir fixtures --generate-mock 20 --seed 7 --balanced
///   convoscope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing conversation JSON files
    ///
    /// Defaults to `conversations`, or the `[corpus] dir` config setting.
    #[arg(short, long, value_name = "DIR", env = "CONVOSCOPE_DIR")]
    pub dir: Option<PathBuf>,

    /// Path to export the per-conversation CSV report
    ///
    /// Defaults to conversation_report_<YYYYMMDD_HHMMSS>.csv
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip the CSV export
    #[arg(long, conflicts_with = "output")]
    pub no_export: bool,

    /// Number of top feedback themes to show
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub top_n: Option<usize>,

    /// Also write a full report document to this path
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Format of the --report document (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Only analyze conversations saved on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub since: Option<NaiveDate>,

    /// Only analyze conversations saved on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub until: Option<NaiveDate>,

    /// Fail if the average score is below this value
    ///
    /// Useful for CI pipelines. Exit code 2 when the average falls short.
    #[arg(long, value_name = "SCORE")]
    pub min_avg_score: Option<f64>,

    /// File suffix that marks a conversation file
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Separator for feedback points in the CSV export
    #[arg(long, value_name = "SEP")]
    pub delimiter: Option<String>,

    /// Generate this many mock conversations into --dir and exit
    #[arg(long, value_name = "COUNT")]
    pub generate_mock: Option<usize>,

    /// Seed for --generate-mock, for reproducible output
    #[arg(long, value_name = "SEED", requires = "generate_mock")]
    pub seed: Option<u64>,

    /// Give --generate-mock a fixed sentiment mix (40% negative)
    #[arg(long, requires = "generate_mock")]
    pub balanced: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .convoscope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .convoscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.top_n == Some(0) {
            return Err("Top N must be at least 1".to_string());
        }

        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                return Err(format!(
                    "--since ({}) must not be after --until ({})",
                    since, until
                ));
            }
        }

        if let Some(score) = self.min_avg_score {
            if !(0.0..=10.0).contains(&score) {
                return Err("Minimum average score must be between 0 and 10".to_string());
            }
        }

        if self.generate_mock == Some(0) {
            return Err("Mock conversation count must be at least 1".to_string());
        }

        if let Some(ref ext) = self.extension {
            if ext.trim_start_matches('.').is_empty() {
                return Err("Extension must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; --quiet overrides it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Path of the CSV export, timestamped when not given.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&Local::now()))
    }
}

/// Timestamped default CSV path, e.g. `conversation_report_20250301_091500.csv`.
pub fn default_output_path<Tz: TimeZone>(now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    PathBuf::from(format!(
        "conversation_report_{}.csv",
        now.format("%Y%m%d_%H%M%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_args() -> Args {
        Args {
            dir: Some(PathBuf::from("conversations")),
            output: None,
            no_export: false,
            top_n: None,
            report: None,
            format: OutputFormat::Markdown,
            since: None,
            until: None,
            min_avg_score: None,
            extension: None,
            delimiter: None,
            generate_mock: None,
            seed: None,
            balanced: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "convoscope",
            "--dir",
            "saved",
            "-n",
            "10",
            "--since",
            "2025-03-01",
            "--format",
            "json",
        ]);
        assert_eq!(args.dir, Some(PathBuf::from("saved")));
        assert_eq!(args.top_n, Some(10));
        assert_eq!(args.since, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_top_n() {
        let mut args = make_args();
        args.top_n = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_date_order() {
        let mut args = make_args();
        args.since = NaiveDate::from_ymd_opt(2025, 3, 10);
        args.until = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert!(args.validate().is_err());

        args.until = args.since;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_min_avg_score() {
        let mut args = make_args();
        args.min_avg_score = Some(11.0);
        assert!(args.validate().is_err());

        args.min_avg_score = Some(7.5);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_seed_requires_generate_mock() {
        let result = Args::try_parse_from(["convoscope", "--seed", "7"]);
        assert!(result.is_err());

        let result = Args::try_parse_from(["convoscope", "--balanced"]);
        assert!(result.is_err());

        let args =
            Args::try_parse_from(["convoscope", "--generate-mock", "20", "--balanced"]).unwrap();
        assert!(args.balanced);
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_from_config_verbose() {
        let mut args = make_args();
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_default_output_path() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 15, 0).unwrap();
        assert_eq!(
            default_output_path(&now),
            PathBuf::from("conversation_report_20250301_091500.csv")
        );

        let mut args = make_args();
        args.output = Some(PathBuf::from("custom.csv"));
        assert_eq!(args.output_path(), PathBuf::from("custom.csv"));
    }
}
