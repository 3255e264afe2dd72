//! Error types for FETCH response extraction.

use thiserror::Error;

/// Errors that can occur while extracting a message.
#[derive(Debug, Error)]
pub enum Error {
    /// The status line could not be tokenized.
    #[error("Protocol error at position {position}: {message}")]
    Parse {
        /// Byte position where the error occurred.
        position: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// The leading FETCH line does not have the expected shape.
    #[error("Malformed FETCH response: {0}")]
    MalformedResponse(String),

    /// The response has no lines.
    #[error("Response is empty")]
    Exhausted,

    /// The message body could not be parsed or decoded.
    #[error("MIME error: {0}")]
    Mime(#[from] mailtree_mime::Error),
}

impl Error {
    /// Returns true if content decoding failed.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::Mime(mailtree_mime::Error::Decode(_)))
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
