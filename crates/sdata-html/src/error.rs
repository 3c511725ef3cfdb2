//! Engine setup errors.

use sdata_vocab::VocabularyError;

/// Error raised while configuring an [`Engine`](crate::Engine).
///
/// Rewriting itself never fails; only setup problems are reported.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Semantic name is neither `microdata` nor `rdfa`.
    #[error("Unknown semantic '{0}', expected 'microdata' or 'rdfa'")]
    UnknownSemantic(String),
    /// Vocabulary could not be loaded.
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}
