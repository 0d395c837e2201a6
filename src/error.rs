use std::io;

use thiserror::Error;

/// Errors surfaced to the host by any plugin entry point.
#[derive(Debug, Error)]
pub enum Error {
    /// File-system level failure (missing file, permissions, ...), passed through as-is.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The file was readable but could not be decoded.
    #[error("import failed: {0}")]
    Import(String),

    /// Settings or a document could not be (de)serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A dataset wildcard could not be turned into a matcher.
    #[error("invalid dataset pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A plugin field was missing, of the wrong type or out of range.
    #[error("field '{name}': {reason}")]
    Field { name: String, reason: String },

    /// The fit could not be computed for the given data.
    #[error("fit failed: {0}")]
    Fit(String),

    /// The host rejected a request (unknown dataset, unknown widget, ...).
    #[error("{0}")]
    Host(String),
}

impl Error {
    pub(crate) fn field(name: &str, reason: impl Into<String>) -> Self {
        Error::Field {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// True when the error came from the file system rather than from decoding.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
