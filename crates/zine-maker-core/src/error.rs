use thiserror::Error;

/// Unified error type for zine-maker-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Source documents that do not parse as PDFs
/// - Serialization of the assembled booklet
/// - Configuration loading
/// - General I/O operations
///
/// Auto-load retrieval failures are deliberately NOT errors: a missing
/// preconfigured booklet is a normal outcome and surfaces as `None` from
/// [`crate::source::BookletSource::fetch`].
#[derive(Error, Debug)]
pub enum Error {
    /// A source buffer is not a well-formed PDF. `index` is the position of
    /// the offending buffer in the merge input sequence.
    #[error("source {index} is not a valid PDF: {reason}")]
    MalformedInput { index: usize, reason: String },

    /// Failed to serialize the assembled booklet
    #[error("failed to save booklet: {0}")]
    PdfSave(String),

    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
