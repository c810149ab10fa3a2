use std::borrow::Cow;
use std::fmt;
use std::str;

use crate::error::{BadRequest, Result};

/// The only protocol version accepted in a request-line.
pub const HTTP_11: &str = "1.1";

/// A validated request-line, `METHOD SP TARGET SP HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    target: Vec<u8>,
    version: String,
}

impl RequestLine {
    /// The request method, as received. Never empty.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request target. This is not validated as an URI.
    ///
    /// Bytes that are not UTF-8 are replaced, see [`RequestLine::target_bytes()`]
    /// for the target as received.
    pub fn target(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.target)
    }

    pub fn target_bytes(&self) -> &[u8] {
        &self.target
    }

    /// The protocol version without the `HTTP/` prefix. Always `1.1`.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} HTTP/{}", self.method, self.target(), self.version)
    }
}

/// Check a method is made of uppercase letters only.
///
/// This is not part of the default validation, see
/// [`ParserConfig::require_upper_method`][crate::ParserConfig::require_upper_method].
pub fn is_upper_method(method: &str) -> bool {
    method.chars().all(|c| c.is_alphabetic() && c.is_uppercase())
}

/// Validate a line (terminator already stripped) as a request-line.
pub(crate) fn parse_request_line(line: &[u8], require_upper_method: bool) -> Result<RequestLine> {
    let mut parts = line.split(|c| *c == b' ');

    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(BadRequest::Malformed.into());
    };

    if method.is_empty() {
        return Err(BadRequest::Malformed.into());
    }

    let mut vparts = version.split(|c| *c == b'/');

    let (Some(b"HTTP"), Some(b"1.1"), None) = (vparts.next(), vparts.next(), vparts.next()) else {
        return Err(BadRequest::Version.into());
    };

    // The target is opaque, but the method is a token.
    let method = str::from_utf8(method).map_err(|_| BadRequest::NotUtf8)?;

    if require_upper_method && !is_upper_method(method) {
        return Err(BadRequest::MethodCase.into());
    }

    Ok(RequestLine {
        method: method.to_string(),
        target: target.to_vec(),
        version: HTTP_11.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Error;

    fn bad(line: &[u8]) -> BadRequest {
        match parse_request_line(line, false) {
            Err(Error::BadRequest(b)) => b,
            r => panic!("expected bad request for {:?}: {:?}", line, r),
        }
    }

    #[test]
    fn parse_ok() -> Result<()> {
        let l = parse_request_line(b"GET /coffee HTTP/1.1", false)?;
        assert_eq!(l.method(), "GET");
        assert_eq!(l.target(), "/coffee");
        assert_eq!(l.version(), "1.1");
        assert_eq!(l.to_string(), "GET /coffee HTTP/1.1");
        Ok(())
    }

    #[test]
    fn target_is_opaque() -> Result<()> {
        let l = parse_request_line(b"OPTIONS * HTTP/1.1", false)?;
        assert_eq!(l.target(), "*");
        let l = parse_request_line(b"get http://x.test:80/a?b=c HTTP/1.1", false)?;
        assert_eq!(l.method(), "get");
        assert_eq!(l.target(), "http://x.test:80/a?b=c");
        let l = parse_request_line(b"GET  HTTP/1.1", false)?;
        assert_eq!(l.target(), "");
        Ok(())
    }

    #[test]
    fn wrong_token_count() {
        assert_eq!(bad(b"GET /"), BadRequest::Malformed);
        assert_eq!(bad(b"GET / HTTP/1.1 extra"), BadRequest::Malformed);
        assert_eq!(bad(b""), BadRequest::Malformed);
        assert_eq!(bad(b"GET  / HTTP/1.1"), BadRequest::Malformed);
        assert_eq!(bad(b"GET / HTTP/1.1 "), BadRequest::Malformed);
        assert_eq!(bad(b" / HTTP/1.1"), BadRequest::Malformed);
    }

    #[test]
    fn wrong_version() {
        assert_eq!(bad(b"GET / HTTP/1.0"), BadRequest::Version);
        assert_eq!(bad(b"GET / HTTP/2"), BadRequest::Version);
        assert_eq!(bad(b"GET / http/1.1"), BadRequest::Version);
        assert_eq!(bad(b"GET / HTTP1.1"), BadRequest::Version);
        assert_eq!(bad(b"GET / HTTP/1.1/x"), BadRequest::Version);
        assert_eq!(bad(b"GET / HTTP/"), BadRequest::Version);
    }

    #[test]
    fn non_utf8_target() -> Result<()> {
        let l = parse_request_line(b"GET /caf\xe9 HTTP/1.1", false)?;
        assert_eq!(l.method(), "GET");
        assert_eq!(l.target_bytes(), b"/caf\xe9");
        assert_eq!(l.target(), "/caf\u{fffd}");
        Ok(())
    }

    #[test]
    fn non_utf8_method() {
        assert_eq!(bad(b"G\xffT / HTTP/1.1"), BadRequest::NotUtf8);
    }

    #[test]
    fn upper_method() {
        assert!(is_upper_method("GET"));
        assert!(is_upper_method("PATCH"));
        assert!(!is_upper_method("Get"));
        assert!(!is_upper_method("M-SEARCH"));
        assert!(!is_upper_method("GET1"));

        assert!(parse_request_line(b"get / HTTP/1.1", false).is_ok());
        assert!(matches!(
            parse_request_line(b"get / HTTP/1.1", true),
            Err(Error::BadRequest(BadRequest::MethodCase))
        ));
        assert!(parse_request_line(b"GET / HTTP/1.1", true).is_ok());
    }
}
