//! Sans-IO, incremental http 1.1 request-line parser.
//!
//! Bytes can arrive in any chunking: nothing, half a line, or a line and
//! then some. [`RequestLineParser`] buffers what it is fed until it sees the
//! `\r\n` terminator, then validates `METHOD SP TARGET SP HTTP/1.1`.
//! The parser never does IO itself. [`RequestLineReader`] is the loop that
//! drives it from an [`std::io::Read`].
//!
//! # Example
//!
//! ```
//! use reqline::{Error, RequestLineParser};
//!
//! let mut parser = RequestLineParser::new();
//!
//! // Split anywhere, including between \r and \n.
//! assert_eq!(parser.feed(b"GET / HTTP/1.1\r")?, 0);
//! assert_eq!(parser.feed(b"\n")?, 16);
//!
//! let line = parser.request_line().unwrap();
//! assert_eq!(line.method(), "GET");
//! assert_eq!(line.target(), "/");
//! assert_eq!(line.version(), "1.1");
//!
//! // Only HTTP/1.1 is accepted.
//! let mut parser = RequestLineParser::new();
//! let err = parser.feed(b"GET / HTTP/1.0\r\n").unwrap_err();
//! assert!(matches!(err, Error::BadRequest(_)));
//! # Ok::<(), Error>(())
//! ```

#[macro_use]
extern crate log;

mod buffer;

mod error;
pub use error::{BadRequest, Error};

mod line;
pub use line::{is_upper_method, RequestLine, HTTP_11};

mod parser;
pub use parser::{ParserConfig, RequestLineParser, State};

mod reader;
pub use reader::{read_request_line, ReaderConfig, RequestLineReader};
