use std::io;
use std::str::Utf8Error;
use thiserror::Error;

/// A type alias for handling `Result`s with `Error`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while modeling or coding an MRCP message.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Start-line did not match any known request/response/event form.
    #[error("invalid start-line: {0}")]
    InvalidStartLine(String),

    /// Header field line was not `name SP ":" SP value CRLF`.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Channel-Identifier header was present but not `session_id@resource_name`.
    #[error("invalid channel identifier: {0}")]
    InvalidChannelId(String),

    /// Request/event method name not found in the resolved resource's method table.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Event name not found in the resolved resource's event table.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Resource name not found in the registry.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Content-Length disagreed with the body actually accumulated.
    #[error("content-length mismatch: expected {expected}, got {actual}")]
    ContentLengthMismatch { expected: usize, actual: usize },

    /// The parser needs more bytes before a message or any of its parts is complete.
    #[error("incomplete message: {0}")]
    Incomplete(String),

    /// A syntactic error the parser cannot recover from; the caller must discard
    /// the parser state (per the message codec's `INVALID` status).
    #[error("invalid message: {0}")]
    Invalid(String),

    /// Start-line exceeded the configured maximum line length.
    #[error("line too long: {0} bytes")]
    LineTooLong(usize),

    /// Header count exceeded the configured maximum.
    #[error("too many headers: {0}")]
    TooManyHeaders(usize),

    /// Body length exceeded the configured maximum.
    #[error("body too large: {0} bytes")]
    BodyTooLarge(usize),

    /// Destination buffer filled mid-generation; caller should flush and resume.
    #[error("generation truncated after {0} bytes")]
    Truncated(usize),

    #[error("invalid utf-8: {0}")]
    Utf8(#[from] Utf8Error),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
