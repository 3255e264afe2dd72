//! Error types for MIME operations.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME parsing error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transfer-encoding reversal or charset interpretation failed.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The line cursor ran out of input.
    #[error("Input exhausted")]
    Exhausted,

    /// A header line could not be split into name and value.
    #[error("Malformed header line: {0}")]
    MalformedHeader(String),

    /// Multipart entity without a boundary parameter.
    #[error("Missing boundary in multipart content type: {0}")]
    MissingBoundary(String),

    /// Multipart nesting went past the configured limit.
    #[error("MIME nesting deeper than {limit} levels")]
    NestingTooDeep {
        /// Configured maximum depth.
        limit: usize,
    },

    /// The message holds more body parts than the configured limit.
    #[error("More than {limit} body parts in message")]
    TooManyParts {
        /// Configured maximum part count.
        limit: usize,
    },
}

/// Content decoding failures.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Invalid quoted-printable escape.
    #[error("Invalid quoted-printable data: {0}")]
    QuotedPrintable(String),

    /// Transfer encoding name not recognized.
    #[error("Unknown transfer encoding: {0}")]
    UnknownTransferEncoding(String),

    /// Charset label not recognized.
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// Decoded bytes are not valid in the declared charset.
    #[error("Malformed {charset} text")]
    MalformedText {
        /// Charset the bytes were interpreted under.
        charset: String,
    },
}
