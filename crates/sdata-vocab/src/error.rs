//! Vocabulary loading errors.

use std::path::PathBuf;

/// Error raised when the vocabulary data cannot be loaded.
///
/// Lookups of unknown types or properties never fail; only a missing or
/// malformed data source is reported.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    /// The data file could not be read.
    #[error("Failed to read vocabulary {}: {source}", path.display())]
    Io {
        /// Path of the vocabulary file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The data is not a valid vocabulary document.
    #[error("Invalid vocabulary data: {0}")]
    Parse(#[from] serde_json::Error),
    /// The vocabulary shipped with the crate failed to parse.
    #[error("Invalid bundled vocabulary: {0}")]
    Bundled(String),
}
