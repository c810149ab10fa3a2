use crate::buffer::LineBuffer;
use crate::error::{Error, Result};
use crate::line::{parse_request_line, RequestLine};

/// Parser configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Max length of the request-line, excluding the terminator.
    ///
    /// `None` means the buffer grows until a terminator shows up.
    pub max_line_len: Option<usize>,

    /// Reject methods that are not all uppercase letters.
    pub require_upper_method: bool,
}

impl ParserConfig {
    pub fn max_line_len(mut self, v: usize) -> Self {
        self.max_line_len = Some(v);
        self
    }

    pub fn require_upper_method(mut self, v: bool) -> Self {
        self.require_upper_method = v;
        self
    }
}

/// Parser state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    /// No complete line yet.
    #[default]
    AwaitingLine,
    /// The request-line is parsed. Terminal.
    Done,
}

/// Incremental request-line parser.
///
/// Feed it bytes as they arrive. Chunk boundaries do not matter, the
/// outcome is the same as feeding everything at once.
///
/// ```
/// use reqline::RequestLineParser;
///
/// let mut p = RequestLineParser::new();
///
/// // Not enough input yet.
/// assert_eq!(p.feed(b"GET /path HT")?, 0);
/// assert!(!p.is_done());
///
/// // The line is complete, 20 bytes are claimed by it.
/// assert_eq!(p.feed(b"TP/1.1\r\nHost: x")?, 20);
/// assert!(p.is_done());
///
/// let line = p.request_line().unwrap();
/// assert_eq!(line.method(), "GET");
/// assert_eq!(line.target(), "/path");
/// assert_eq!(line.version(), "1.1");
///
/// // What came after the terminator is kept.
/// assert_eq!(p.remainder(), b"Host: x");
/// # Ok::<(), reqline::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct RequestLineParser {
    config: ParserConfig,
    buffer: LineBuffer,
    line: Option<RequestLine>,
    state: State,
}

impl RequestLineParser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        RequestLineParser {
            config,
            buffer: LineBuffer::new(),
            line: None,
            state: State::AwaitingLine,
        }
    }

    /// Feed the next chunk of input.
    ///
    /// Returns the number of buffered bytes claimed by the request-line and
    /// its terminator. This counts bytes from earlier chunks too. 0 means more
    /// input is needed. Once done, feeding is a no-op that returns 0.
    ///
    /// An error leaves the parser unusable.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<usize> {
        if self.is_done() {
            trace!("Feed after done: {} bytes ignored", chunk.len());
            return Ok(0);
        }

        if chunk.is_empty() {
            return Ok(0);
        }

        self.buffer.append(chunk);

        let Some(index) = self.buffer.find_terminator() else {
            trace!("No terminator, {} bytes buffered", self.buffer.len());
            // A trailing CR may be the start of the terminator.
            let pending = self.buffer.len() - usize::from(self.buffer.ends_with(b"\r"));
            self.check_len(pending)?;
            return Ok(0);
        };

        self.check_len(index)?;

        let line = parse_request_line(&self.buffer[..index], self.config.require_upper_method)?;
        trace!("Read request-line: {}", line);

        let consumed = index + 2;
        self.buffer.consume(consumed);

        self.line = Some(line);
        self.state = State::Done;

        Ok(consumed)
    }

    fn check_len(&self, len: usize) -> Result<()> {
        match self.config.max_line_len {
            Some(limit) if len > limit => {
                debug!("Request-line exceeds {} bytes", limit);
                Err(Error::RequestLineTooLong { limit })
            }
            _ => Ok(()),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// The parsed line, once done.
    pub fn request_line(&self) -> Option<&RequestLine> {
        self.line.as_ref()
    }

    /// Take ownership of the parsed line. The parser stays done.
    pub fn take_request_line(&mut self) -> Option<RequestLine> {
        self.line.take()
    }

    /// Number of bytes held that are not claimed by the request-line.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes not claimed by the request-line.
    ///
    /// Before done, this is the partial line. After, it is whatever followed
    /// the terminator.
    pub fn remainder(&self) -> &[u8] {
        &self.buffer
    }

    pub fn take_remainder(&mut self) -> Vec<u8> {
        self.buffer.take()
    }
}
