use std::fmt;
use std::ops::Deref;

/// Bytes fed to the parser that are not yet claimed by a completed line.
#[derive(Default)]
pub(crate) struct LineBuffer {
    buffer: Vec<u8>,
    // Where the next terminator scan starts. Everything before this
    // is known not to contain CRLF.
    scanned: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Find the first CRLF at or after the scan position.
    ///
    /// The scan position only moves forward when no CRLF is found, so a found
    /// CRLF is found again until consumed. The returned offset is relative to
    /// the start of the buffer.
    pub fn find_terminator(&mut self) -> Option<usize> {
        let found = find_crlf(&self.buffer[self.scanned..]).map(|i| i + self.scanned);

        if found.is_none() {
            // A trailing CR can still be completed by the next chunk.
            self.scanned = self.buffer.len().saturating_sub(1);
        }

        found
    }

    /// Drop `amount` bytes from the front and keep the tail.
    pub fn consume(&mut self, amount: usize) {
        if amount > self.buffer.len() {
            panic!("consume more than buffer len");
        }
        self.buffer.drain(..amount);
        self.scanned = 0;
    }

    pub fn take(&mut self) -> Vec<u8> {
        self.scanned = 0;
        std::mem::take(&mut self.buffer)
    }
}

impl Deref for LineBuffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl fmt::Debug for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineBuffer")
            .field("len", &self.buffer.len())
            .field("scanned", &self.scanned)
            .finish()
    }
}

pub(crate) fn find_crlf(b: &[u8]) -> Option<usize> {
    b.windows(2).position(|w| w == b"\r\n")
}
