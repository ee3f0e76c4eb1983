//! pdfsed script lexer.
//!
//! Scripts are sequences of commands terminated by `;`:
//!
//! ```text
//! set title "Scan" author "Me" ;
//! create page size 595 842 ;
//! draw image "page-01.png" dpi 300 mask 0xffffff ;
//! draw text "page-01.djvused" dpi 300 ;
//! ```
//!
//! The lexer does not know the command grammar. It classifies bare atoms
//! and reads typed literals on request; [`super::ScriptReader`] decides which
//! reader to call next.

use std::io::BufRead;

use crate::error::{Error, Result};
use crate::source::{is_whitespace, ByteSource};

use super::atom::{Atom, MAX_ATOM_LEN};

const STRING_CHUNK: usize = 32;

/// Reads atoms and literals from a pdfsed script.
pub struct ScriptLexer<R> {
    src: ByteSource<R>,
    exhausted: bool,
    last_atom: String,
}

impl<R: BufRead> ScriptLexer<R> {
    /// Lex a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            src: ByteSource::new(reader),
            exhausted: false,
            last_atom: String::new(),
        }
    }

    /// Whether end of stream has been reached while reading an atom.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Text of the last bare atom read, `;` excluded.
    pub fn last_atom(&self) -> &str {
        &self.last_atom
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.src.offset()
    }

    /// Read and classify the next atom.
    ///
    /// A bare `;` and the end of stream are both [`Atom::EndOfCommand`]; the
    /// latter also marks the lexer exhausted. Atoms outside the vocabulary are
    /// logged and returned as [`Atom::Unknown`].
    pub fn read_atom(&mut self) -> Result<Atom> {
        let first = match self.src.skip_whitespace()? {
            None => {
                self.exhausted = true;
                return Ok(Atom::EndOfCommand);
            }
            Some(b';') => return Ok(Atom::EndOfCommand),
            Some(b) => b,
        };

        let mut buf = Vec::with_capacity(MAX_ATOM_LEN);
        let mut next = Some(first);
        while let Some(b) = next {
            if is_whitespace(b) {
                break;
            }
            if b == b';' {
                self.src.unread(b);
                break;
            }
            if buf.len() == MAX_ATOM_LEN {
                return Err(Error::malformed(format!(
                    "atom longer than {} bytes: {}...",
                    MAX_ATOM_LEN,
                    String::from_utf8_lossy(&buf)
                )));
            }
            buf.push(b);
            next = self.src.next_byte()?;
        }

        self.last_atom = String::from_utf8_lossy(&buf).into_owned();
        let atom = Atom::classify(&self.last_atom);
        if atom == Atom::Unknown {
            log::warn!("Unknown pdfsed atom: {}", self.last_atom);
        }
        Ok(atom)
    }

    /// Read a quoted string.
    ///
    /// Only `\t`, `\n` and `\r` are escapes; any other escaped character is
    /// taken literally.
    pub fn read_str(&mut self) -> Result<String> {
        match self.src.skip_whitespace()? {
            Some(b'"') => {}
            Some(b) => {
                return Err(Error::malformed(format!(
                    "expected '\"', found '{}'",
                    char::from(b)
                )))
            }
            None => return Err(Error::StreamExhausted),
        }

        let mut buf = Vec::with_capacity(STRING_CHUNK);
        loop {
            let b = self.src.next_byte()?.ok_or(Error::StreamExhausted)?;
            match b {
                b'"' => break,
                b'\\' => {
                    let escaped = self.src.next_byte()?.ok_or(Error::StreamExhausted)?;
                    buf.push(match escaped {
                        b't' => b'\t',
                        b'n' => b'\n',
                        b'r' => b'\r',
                        other => other,
                    });
                }
                _ => buf.push(b),
            }
            if buf.len() == buf.capacity() {
                buf.try_reserve(STRING_CHUNK)
                    .map_err(|_| Error::AllocationFailure)?;
            }
        }
        String::from_utf8(buf).map_err(|e| Error::Encoding(e.to_string()))
    }

    /// Read a decimal floating point number such as `12`, `-0.5` or `1e3`.
    pub fn read_float(&mut self) -> Result<f32> {
        let text = self.scan_number(true)?;
        text.parse::<f32>()
            .map_err(|_| Error::malformed(format!("invalid number '{}'", text)))
    }

    /// Read a decimal integer.
    pub fn read_int(&mut self) -> Result<i32> {
        let text = self.scan_number(false)?;
        text.parse::<i32>()
            .map_err(|_| Error::malformed(format!("invalid integer '{}'", text)))
    }

    /// Read a `0x`-prefixed hexadecimal colour.
    pub fn read_color(&mut self) -> Result<u32> {
        match self.src.skip_whitespace()? {
            Some(b'0') => {}
            Some(b) => {
                return Err(Error::malformed(format!(
                    "colour must start with 0x, found '{}'",
                    char::from(b)
                )))
            }
            None => return Err(Error::StreamExhausted),
        }
        match self.src.next_byte()? {
            Some(b'x') => {}
            Some(_) => return Err(Error::malformed("colour must start with 0x")),
            None => return Err(Error::StreamExhausted),
        }

        let mut digits = String::new();
        while let Some(b) = self.src.next_byte()? {
            if b.is_ascii_hexdigit() {
                digits.push(char::from(b));
            } else {
                self.src.unread(b);
                break;
            }
        }
        if digits.is_empty() {
            return Err(Error::malformed("colour has no hex digits"));
        }
        u32::from_str_radix(&digits, 16)
            .map_err(|_| Error::malformed(format!("colour 0x{} out of range", digits)))
    }

    /// Skip the rest of the current command, up to and including its `;`.
    ///
    /// Quoted strings are stepped over so a `;` inside one does not end the
    /// command.
    pub fn skip_command(&mut self) -> Result<()> {
        let mut in_string = false;
        while let Some(b) = self.src.next_byte()? {
            match (in_string, b) {
                (false, b';') => return Ok(()),
                (false, b'"') => in_string = true,
                (true, b'"') => in_string = false,
                (true, b'\\') => {
                    self.src.next_byte()?;
                }
                _ => {}
            }
        }
        self.exhausted = true;
        Ok(())
    }

    /// Collect the characters of a number, leaving the first byte that is
    /// not part of it in the stream.
    fn scan_number(&mut self, fractional: bool) -> Result<String> {
        let first = self.src.skip_whitespace()?.ok_or(Error::StreamExhausted)?;
        let mut text = String::new();
        let mut state = NumberState::Sign;
        let mut next = Some(first);

        while let Some(b) = next {
            let accepted = match (state, b) {
                (NumberState::Sign, b'+' | b'-') => {
                    state = NumberState::Integer;
                    true
                }
                (NumberState::Sign | NumberState::Integer, b'0'..=b'9') => {
                    state = NumberState::Integer;
                    true
                }
                (NumberState::Sign | NumberState::Integer, b'.') if fractional => {
                    state = NumberState::Fraction;
                    true
                }
                (NumberState::Fraction, b'0'..=b'9') => true,
                (NumberState::Integer | NumberState::Fraction, b'e' | b'E')
                    if fractional && text.bytes().any(|c| c.is_ascii_digit()) =>
                {
                    state = NumberState::ExponentSign;
                    true
                }
                (NumberState::ExponentSign, b'+' | b'-') => {
                    state = NumberState::Exponent;
                    true
                }
                (NumberState::ExponentSign | NumberState::Exponent, b'0'..=b'9') => {
                    state = NumberState::Exponent;
                    true
                }
                _ => false,
            };
            if !accepted {
                self.src.unread(b);
                break;
            }
            text.push(char::from(b));
            next = self.src.next_byte()?;
        }

        if !text.bytes().any(|c| c.is_ascii_digit()) {
            let found = match (text.is_empty(), next) {
                (true, Some(b)) => char::from(b).to_string(),
                _ => text,
            };
            return Err(Error::malformed(format!(
                "expected a number, found '{}'",
                found
            )));
        }
        Ok(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Sign,
    Integer,
    Fraction,
    ExponentSign,
    Exponent,
}
