use std::io;

use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Errors from parsing a request-line.
///
/// Not having enough input yet is not an error. [`RequestLineParser::feed()`][crate::RequestLineParser::feed]
/// signals that by consuming 0 bytes.
#[derive(Debug, Error)]
pub enum Error {
    /// A full line was received, but it is not a valid request-line.
    ///
    /// The stream is unusable after this and should be abandoned.
    #[error("bad request: {0}")]
    BadRequest(BadRequest),

    /// The buffered input grew past the configured maximum line length
    /// without a line terminator.
    #[error("request-line longer than {limit} bytes")]
    RequestLineTooLong { limit: usize },

    /// Reading from the underlying source failed.
    #[error("io: {0}")]
    Io(#[from] io::Error),

    /// The source ended before a complete request-line was read.
    #[error("input ended after {buffered} bytes without a complete request-line")]
    UnexpectedEof { buffered: usize },

    /// The request-line was already read from this reader.
    #[error("request-line already read")]
    AlreadyRead,
}

/// Reasons a terminated line is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadRequest {
    /// Not exactly three space separated tokens, or an empty method.
    Malformed,
    /// The version token is not `HTTP/1.1`.
    Version,
    /// The method is not valid UTF-8.
    NotUtf8,
    /// The method is not all uppercase letters (only when required).
    MethodCase,
}

impl Error {
    /// Whether the error originates outside the parser, i.e. in the byte source.
    pub fn is_source_failure(&self) -> bool {
        matches!(self, Error::Io(_) | Error::UnexpectedEof { .. })
    }

    /// Whether the error is a rejected request-line.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Error::BadRequest(_))
    }
}

impl From<BadRequest> for Error {
    fn from(value: BadRequest) -> Self {
        Error::BadRequest(value)
    }
}

impl std::fmt::Display for BadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BadRequest::Malformed => write!(f, "malformed request-line"),
            BadRequest::Version => write!(f, "unsupported or malformed protocol version"),
            BadRequest::NotUtf8 => write!(f, "method is not utf-8"),
            BadRequest::MethodCase => write!(f, "method is not uppercase"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn source_failure_kinds() {
        let io = Error::from(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert!(io.is_source_failure());
        assert!(Error::UnexpectedEof { buffered: 3 }.is_source_failure());

        let bad = Error::from(BadRequest::Version);
        assert!(!bad.is_source_failure());
        assert!(bad.is_bad_request());
    }

    #[test]
    fn display() {
        assert_eq!(
            Error::from(BadRequest::Malformed).to_string(),
            "bad request: malformed request-line"
        );
        assert_eq!(
            Error::from(BadRequest::Version).to_string(),
            "bad request: unsupported or malformed protocol version"
        );
        assert_eq!(
            Error::RequestLineTooLong { limit: 8 }.to_string(),
            "request-line longer than 8 bytes"
        );
    }
}
