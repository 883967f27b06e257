// Error kinds returned by the library. Every failure is handed back to the
// caller; nothing here logs or exits.

use reqwest::StatusCode;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid credentials (unreadable file, bad JSON, empty field).
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller supplied an empty URL list, file path or MIME type.
    #[error("{0}")]
    Validation(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request never got a response (DNS, connect, TLS, ...).
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with something other than 201 Created.
    #[error("HTTP client returned {status}")]
    Protocol { url: String, status: StatusCode },

    /// Some, but not all, destinations accepted the upload.
    #[error("uploaded to {succeeded} of {total} URLs, last error: {last}")]
    PartialSuccess {
        succeeded: usize,
        total: usize,
        #[source]
        last: Box<Error>,
    },
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// `(succeeded, total)` for a partial success, `None` for anything else.
    pub fn partial_counts(&self) -> Option<(usize, usize)> {
        match self {
            Error::PartialSuccess {
                succeeded, total, ..
            } => Some((*succeeded, *total)),
            _ => None,
        }
    }

    pub fn is_partial_success(&self) -> bool {
        matches!(self, Error::PartialSuccess { .. })
    }
}
