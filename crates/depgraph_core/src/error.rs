//! Analyzer error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the analyzer.
///
/// Only [`AnalysisError::Cancelled`] escapes
/// [`Analyzer::analyze_workspace`](crate::Analyzer::analyze_workspace); the
/// other variants are produced per file and downgraded to warnings by the
/// graph builder.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The caller cancelled the analysis
    #[error("analysis cancelled")]
    Cancelled,

    /// A source file could not be parsed
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A source file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AnalysisError::Cancelled)
    }
}
