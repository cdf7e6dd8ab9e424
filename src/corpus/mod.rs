//! Corpus loading for saved conversation files.
//!
//! A corpus is a single directory of JSON documents. Files are selected by
//! suffix, read in sorted filename order and normalized one by one. The
//! first unreadable or malformed file aborts the whole load.

pub mod normalize;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::AnalysisError;
use crate::models::FlatRecord;

pub use normalize::{normalize_record, parse_record};

/// Configuration for corpus loading.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// File suffix that qualifies a file (without dot)
    pub extension: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            extension: "json".to_string(),
        }
    }
}

impl From<&crate::config::CorpusConfig> for LoadConfig {
    fn from(config: &crate::config::CorpusConfig) -> Self {
        Self {
            extension: config.extension.trim_start_matches('.').to_string(),
        }
    }
}

/// Loader for one conversation directory.
pub struct CorpusLoader {
    config: LoadConfig,
    root: PathBuf,
}

impl CorpusLoader {
    /// Create a loader for a directory.
    pub fn new(root: impl Into<PathBuf>, config: LoadConfig) -> Self {
        Self {
            config,
            root: root.into(),
        }
    }

    /// List qualifying file names, sorted lexicographically.
    ///
    /// Only regular files directly inside the directory are considered.
    pub fn scan(&self) -> Result<Vec<String>, AnalysisError> {
        if !self.root.is_dir() {
            return Err(AnalysisError::CorpusNotFound {
                path: self.root.clone(),
            });
        }

        let mut names = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    debug!("Cannot read directory {}: {}", self.root.display(), e);
                    return Err(AnalysisError::CorpusNotFound {
                        path: self.root.clone(),
                    });
                }
                Err(e) => {
                    let filename = e
                        .path()
                        .and_then(Path::file_name)
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    return Err(AnalysisError::Read {
                        filename,
                        source: e.into(),
                    });
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                debug!("Skipping non UTF-8 file name: {:?}", entry.file_name());
                continue;
            };

            if self.matches(name) {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Load every qualifying file into a [`FlatRecord`], in filename order.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::CorpusNotFound`] if the root is not a readable directory.
    /// - [`AnalysisError::EmptyCorpus`] if no file qualifies.
    /// - [`AnalysisError::Read`] or [`AnalysisError::MalformedInput`] for the
    ///   first file that cannot be read or normalized.
    pub fn load(&self) -> Result<Vec<FlatRecord>, AnalysisError> {
        let names = self.scan()?;

        if names.is_empty() {
            return Err(AnalysisError::EmptyCorpus {
                path: self.root.clone(),
                extension: self.config.extension.clone(),
            });
        }

        let mut records = Vec::with_capacity(names.len());
        for name in names {
            let content =
                fs::read_to_string(self.root.join(&name)).map_err(|source| AnalysisError::Read {
                    filename: name.clone(),
                    source,
                })?;

            let record = parse_record(&content, &name)?;
            debug!(
                "Loaded {} (score: {:?}, turns: {})",
                name, record.score, record.total_turns
            );
            records.push(record);
        }

        info!(
            "Loaded {} conversations from {}",
            records.len(),
            self.root.display()
        );
        Ok(records)
    }

    /// Check if a file name carries the corpus suffix.
    pub fn matches(&self, name: &str) -> bool {
        name.strip_suffix(self.config.extension.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    }
}

/// Load a directory of `.json` conversations with default settings.
#[allow(dead_code)] // Convenience wrapper
pub fn load_corpus(dir: impl AsRef<Path>) -> Result<Vec<FlatRecord>, AnalysisError> {
    CorpusLoader::new(dir.as_ref(), LoadConfig::default()).load()
}
