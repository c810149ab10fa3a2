use std::io;
use std::mem;

/// Splits a reader into `\n` terminated lines.
///
/// The `\n` is stripped, anything else (like a `\r`) is kept. A last line
/// without `\n` is returned when the reader ends.
pub struct LineReader<R> {
    reader: Option<R>,
    chunk: Vec<u8>,
    buffer: Vec<u8>,
    scanned: usize,
}

impl<R: io::Read> LineReader<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        LineReader {
            reader: Some(reader),
            chunk: vec![0; chunk_size.max(1)],
            buffer: Vec::new(),
            scanned: 0,
        }
    }

    pub fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        loop {
            let found = self.buffer[self.scanned..].iter().position(|c| *c == b'\n');

            if let Some(i) = found {
                let end = self.scanned + i;
                let line = self.buffer[..end].to_vec();
                self.buffer.drain(..=end);
                self.scanned = 0;
                return Ok(Some(line));
            }

            self.scanned = self.buffer.len();

            let Some(reader) = &mut self.reader else {
                self.scanned = 0;
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(mem::take(&mut self.buffer)));
            };

            let n = match reader.read(&mut self.chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if n == 0 {
                self.reader = None;
            } else {
                self.buffer.extend_from_slice(&self.chunk[..n]);
            }
        }
    }
}

impl<R: io::Read> Iterator for LineReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
