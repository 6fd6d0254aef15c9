//! Error types for HTML to Org conversion.

use thiserror::Error;

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Errors that can abort a conversion.
///
/// Every error is terminal for the call that produced it: no partial output is
/// returned alongside an error.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The input could not be parsed into a document tree.
    #[error("HTML parsing error: {0}")]
    ParseError(String),

    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A link target could not be resolved, even after escape recovery.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        /// The link as it appeared after trimming.
        url: String,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The configured base URL is not an absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// The configured base URL.
        url: String,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },
}
