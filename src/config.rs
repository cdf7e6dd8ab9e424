//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.convoscope.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".convoscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Corpus settings.
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Where conversations are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding the saved conversation files.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// File suffix that marks a conversation file.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            extension: default_extension(),
        }
    }
}

fn default_dir() -> String {
    "conversations".to_string()
}

fn default_extension() -> String {
    "json".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of top feedback themes to report.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Number of focus areas drawn from negative conversations.
    #[serde(default = "default_focus_top_n")]
    pub focus_top_n: usize,

    /// Separator used when feedback points are joined into one CSV cell.
    #[serde(default = "default_feedback_delimiter")]
    pub feedback_delimiter: String,

    /// Sentiments treated as negative for focus areas.
    #[serde(default = "default_negative_sentiments")]
    pub negative_sentiments: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            focus_top_n: default_focus_top_n(),
            feedback_delimiter: default_feedback_delimiter(),
            negative_sentiments: default_negative_sentiments(),
        }
    }
}

fn default_top_n() -> usize {
    5
}

fn default_focus_top_n() -> usize {
    3
}

fn default_feedback_delimiter() -> String {
    "; ".to_string()
}

fn default_negative_sentiments() -> Vec<String> {
    vec!["Negative", "Frustrated", "Disappointed", "Angry"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.dir {
            self.corpus.dir = dir.display().to_string();
        }
        if let Some(ref extension) = args.extension {
            self.corpus.extension = extension.trim_start_matches('.').to_string();
        }

        if let Some(top_n) = args.top_n {
            self.report.top_n = top_n;
        }
        if let Some(ref delimiter) = args.delimiter {
            self.report.feedback_delimiter = delimiter.clone();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
