use std::io;

use crate::error::{Error, Result};
use crate::line::RequestLine;
use crate::parser::{ParserConfig, RequestLineParser};

const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Configuration for [`RequestLineReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Max bytes asked for in each read from the source.
    pub chunk_size: usize,

    pub parser: ParserConfig,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            parser: ParserConfig::default(),
        }
    }
}

impl ReaderConfig {
    pub fn chunk_size(mut self, v: usize) -> Self {
        self.chunk_size = v.max(1);
        self
    }

    pub fn parser(mut self, v: ParserConfig) -> Self {
        self.parser = v;
        self
    }
}

/// Drives a [`RequestLineParser`] from an [`io::Read`].
///
/// Reads chunks until the request-line is complete. Bytes read past the
/// terminator are kept, see [`RequestLineReader::into_parts()`].
///
/// ```
/// use reqline::RequestLineReader;
///
/// let input = &b"DELETE /thing HTTP/1.1\r\nHost: x\r\n\r\n"[..];
/// let mut reader = RequestLineReader::new(input);
///
/// let line = reader.read_request_line()?;
/// assert_eq!(line.method(), "DELETE");
/// assert_eq!(line.target(), "/thing");
///
/// let (_, leftover) = reader.into_parts();
/// assert_eq!(leftover, b"Host: x\r\n\r\n");
/// # Ok::<(), reqline::Error>(())
/// ```
pub struct RequestLineReader<R> {
    // None once the source has ended.
    reader: Option<R>,
    chunk: Vec<u8>,
    parser: RequestLineParser,
}

impl<R: io::Read> RequestLineReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, ReaderConfig::default())
    }

    pub fn with_config(reader: R, config: ReaderConfig) -> Self {
        RequestLineReader {
            reader: Some(reader),
            chunk: vec![0; config.chunk_size.max(1)],
            parser: RequestLineParser::with_config(config.parser),
        }
    }

    /// Read from the source until a request-line is parsed.
    ///
    /// Fails with [`Error::UnexpectedEof`] if the source ends first, and with
    /// [`Error::AlreadyRead`] if the line was already returned.
    pub fn read_request_line(&mut self) -> Result<RequestLine> {
        if self.parser.is_done() {
            return Err(Error::AlreadyRead);
        }

        loop {
            let n = self.fill_more()?;

            if n == 0 {
                let buffered = self.parser.buffered();
                debug!("Input ended with {} bytes buffered", buffered);
                return Err(Error::UnexpectedEof { buffered });
            }

            self.parser.feed(&self.chunk[..n])?;

            if self.parser.is_done() {
                // A done parser holds the line until taken.
                let line = self.parser.take_request_line().ok_or(Error::AlreadyRead)?;
                return Ok(line);
            }
        }
    }

    fn fill_more(&mut self) -> Result<usize> {
        let Some(reader) = &mut self.reader else {
            return Ok(0);
        };

        let n = loop {
            match reader.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        trace!("Read {} bytes", n);

        if n == 0 {
            // Free readers as soon as possible.
            self.reader = None;
        }

        Ok(n)
    }

    pub fn is_done(&self) -> bool {
        self.parser.is_done()
    }

    /// Bytes read from the source that are not part of the request-line.
    pub fn remainder(&self) -> &[u8] {
        self.parser.remainder()
    }

    /// Give back the source, if it has not ended, and the bytes read past the
    /// request-line terminator.
    pub fn into_parts(mut self) -> (Option<R>, Vec<u8>) {
        let leftover = self.parser.take_remainder();
        (self.reader, leftover)
    }
}

/// Read a request-line from `reader` with the default configuration.
pub fn read_request_line(reader: impl io::Read) -> Result<RequestLine> {
    RequestLineReader::new(reader).read_request_line()
}
