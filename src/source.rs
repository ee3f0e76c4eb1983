//! Forward-only byte source with a single byte of pushback.
//!
//! Both the djvused tokenizer and the pdfsed script lexer read through this
//! type. It reads straight from a [`BufRead`] without copying the whole input.

use std::io::BufRead;

use crate::error::Result;

/// Whitespace as understood by both grammars.
pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Byte reader with one byte of pushback.
pub struct ByteSource<R> {
    inner: R,
    pushback: Option<u8>,
    offset: u64,
}

impl<R: BufRead> ByteSource<R> {
    /// Wrap a buffered reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pushback: None,
            offset: 0,
        }
    }

    /// Next byte, `None` at end of stream.
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.pushback.take() {
            self.offset += 1;
            return Ok(Some(b));
        }
        let byte = match self.inner.fill_buf()?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.inner.consume(1);
        self.offset += 1;
        Ok(Some(byte))
    }

    /// Return one byte to the stream.
    ///
    /// Only one byte can be held; a second call before the next read
    /// replaces the first.
    pub fn unread(&mut self, byte: u8) {
        debug_assert!(self.pushback.is_none(), "only one byte of pushback");
        self.pushback = Some(byte);
        self.offset = self.offset.saturating_sub(1);
    }

    /// Skip whitespace and return the first other byte.
    pub fn skip_whitespace(&mut self) -> Result<Option<u8>> {
        loop {
            match self.next_byte()? {
                Some(b) if is_whitespace(b) => continue,
                other => return Ok(other),
            }
        }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}
