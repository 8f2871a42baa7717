//! Incremental line splitting over arbitrarily chunked bytes.
//!
//! Lines end at `\r\n`, `\n`, or `\r`. Terminators are stripped. Splitting
//! happens on raw bytes before UTF-8 decoding: CR and LF never appear inside
//! a multi-byte sequence, so a character split across two chunks is always
//! reassembled before its line is decoded.

use bytes::{Buf, BytesMut};

const LF: u8 = b'\n';
const CR: u8 = b'\r';

/// UTF-8 encoded byte order mark.
const BOM: &[u8; 3] = b"\xEF\xBB\xBF";

/// Splits a byte stream into text lines, buffering partial lines between calls.
///
/// No limit is placed on line length.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buffer: BytesMut,
    /// Bytes at the front of `buffer` already known to hold no terminator.
    scanned: usize,
    /// The previous line ended in `\r`; a leading `\n` completes that `\r\n`.
    skip_lf: bool,
    bom_checked: bool,
}

impl LineSplitter {
    /// Create a new splitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and iterate over every line it completes.
    ///
    /// Lines not taken from the returned iterator stay buffered and are
    /// yielded by the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Lines<'_> {
        self.buffer.extend_from_slice(chunk);
        Lines { splitter: self }
    }

    /// Flush the unterminated remainder at end of stream.
    ///
    /// Call once the iterator from the last [`feed`](Self::feed) is
    /// exhausted. Returns `None` when nothing is buffered. The splitter is
    /// reset and can start a fresh stream afterwards.
    pub fn finish(&mut self) -> Option<String> {
        if !self.bom_checked && self.buffer.starts_with(BOM) {
            self.buffer.advance(BOM.len());
        }

        let rest = std::mem::take(&mut self.buffer);
        *self = Self::default();

        if rest.is_empty() {
            None
        } else {
            Some(decode(&rest))
        }
    }

    /// Number of bytes held waiting for a terminator.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    fn next_line(&mut self) -> Option<String> {
        if !self.bom_checked {
            if self.buffer.len() < BOM.len() && BOM.starts_with(&self.buffer) {
                // Could still turn out to be a BOM.
                return None;
            }
            if self.buffer.starts_with(BOM) {
                self.buffer.advance(BOM.len());
            }
            self.bom_checked = true;
        }

        if self.skip_lf {
            match self.buffer.first() {
                None => return None,
                Some(&LF) => self.buffer.advance(1),
                Some(_) => {}
            }
            self.skip_lf = false;
        }

        let Some(pos) = memchr::memchr2(CR, LF, &self.buffer[self.scanned..]) else {
            self.scanned = self.buffer.len();
            return None;
        };

        let line = self.buffer.split_to(self.scanned + pos);
        let terminator = self.buffer[0];
        self.buffer.advance(1);
        self.scanned = 0;
        self.skip_lf = terminator == CR;

        Some(decode(&line))
    }
}

/// Lines completed by one [`LineSplitter::feed`] call.
#[derive(Debug)]
pub struct Lines<'a> {
    splitter: &'a mut LineSplitter,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.splitter.next_line()
    }
}

fn decode(line: &[u8]) -> String {
    String::from_utf8_lossy(line).into_owned()
}
