//! Error types for corpus loading and aggregation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the loading and aggregation pipeline.
///
/// Every variant is fatal for the current run; nothing is retried.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("conversation directory not found or not a directory: {}", path.display())]
    CorpusNotFound { path: PathBuf },

    #[error("no .{extension} files found in '{}'", path.display())]
    EmptyCorpus { path: PathBuf, extension: String },

    #[error("malformed conversation file '{filename}': {reason}")]
    MalformedInput { filename: String, reason: String },

    #[error("failed to read conversation file '{filename}'")]
    Read {
        filename: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot summarize an empty set of conversations")]
    EmptyInput,
}

impl AnalysisError {
    /// Filename attached to per-file failures.
    pub fn filename(&self) -> Option<&str> {
        match self {
            AnalysisError::MalformedInput { filename, .. } | AnalysisError::Read { filename, .. } => {
                Some(filename)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_file() {
        let err = AnalysisError::MalformedInput {
            filename: "conversation_1.json".to_string(),
            reason: "expected a JSON object".to_string(),
        };
        assert!(err.to_string().contains("conversation_1.json"));
        assert_eq!(err.filename(), Some("conversation_1.json"));
    }

    #[test]
    fn test_empty_corpus_message() {
        let err = AnalysisError::EmptyCorpus {
            path: PathBuf::from("conversations"),
            extension: "json".to_string(),
        };
        assert_eq!(err.to_string(), "no .json files found in 'conversations'");
        assert_eq!(err.filename(), None);
    }
}
