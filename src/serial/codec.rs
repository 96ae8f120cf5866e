//! # Module: Line Codec
//!
//! ## Responsibility
//! Turns the raw byte stream from the port into text lines, and text commands
//! into terminated byte strings.
//!
//! ## Guarantees
//! - Lines split on `\n`; surrounding whitespace (including `\r`) is trimmed
//! - Invalid UTF-8 is replaced, never rejected
//! - Buffered bytes never exceed `max_line_length`

/// Terminator appended to every outgoing command.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Encodes `text` followed by the line terminator.
pub fn encode_line(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(LINE_TERMINATOR);
    bytes
}

/// Incremental decoder that accumulates chunks until a full line arrives.
#[derive(Debug)]
pub struct LineDecoder {
    buf: Vec<u8>,
    max_line_length: usize,
}

impl LineDecoder {
    /// Creates a decoder that force-flushes lines longer than `max_line_length` bytes.
    pub fn new(max_line_length: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_line_length: max_line_length.max(1),
        }
    }

    /// Feeds one chunk and returns every line it completed, oldest first.
    ///
    /// Blank lines are dropped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &byte in chunk {
            if byte == LINE_TERMINATOR {
                self.flush_into(&mut lines);
                continue;
            }
            self.buf.push(byte);
            if self.buf.len() >= self.max_line_length {
                self.flush_into(&mut lines);
            }
        }

        lines
    }

    /// Flushes a trailing unterminated line at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        let mut lines = Vec::with_capacity(1);
        self.flush_into(&mut lines);
        lines.pop()
    }

    /// Bytes buffered towards the next line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    fn flush_into(&mut self, lines: &mut Vec<String>) {
        if self.buf.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buf).trim().to_string();
        self.buf.clear();
        if !text.is_empty() {
            lines.push(text);
        }
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new(4096)
    }
}
