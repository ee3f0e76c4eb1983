//! djvused reader.
//!
//! A djvused hidden-text script is a nested list:
//!
//! ```text
//! (page 0 0 100 50
//!   (column 0 0 100 50
//!     (para 0 0 100 50
//!       (line 0 0 90 20
//!         (word 0 0 40 20
//!           "Hi")))))
//! ```
//!
//! [`Tokenizer`] splits the byte stream into parentheses, bare atoms and
//! quoted strings. [`DjvusedReader`] builds a [`Tree`] from those tokens by
//! recursive descent.

use std::io::BufRead;

use crate::error::{Error, Result};
use crate::model::{recompute_with_offset, BoundingBox, Level, NodeId, Tree};
use crate::source::{is_whitespace, ByteSource};

use super::options::ParseOptions;

/// Initial capacity of a quoted string buffer.
const STRING_CHUNK: usize = 32;

/// Initial capacity of a bare atom buffer.
const ATOM_CHUNK: usize = 8;

/// A djvused token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `(`
    Open,
    /// `)`
    Close,
    /// Bare atom: a tag or a number
    Atom(String),
    /// Decoded contents of a quoted string
    Str(Vec<u8>),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Open => "'('".to_string(),
            Token::Close => "')'".to_string(),
            Token::Atom(a) => format!("atom '{}'", a),
            Token::Str(s) => format!("string \"{}\"", String::from_utf8_lossy(s)),
        }
    }
}

/// Splits a djvused stream into tokens, one per call.
pub struct Tokenizer<R> {
    src: ByteSource<R>,
}

impl<R: BufRead> Tokenizer<R> {
    /// Tokenize a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            src: ByteSource::new(reader),
        }
    }

    /// Read the next token, `None` if the stream ends before any token content.
    ///
    /// End of stream inside a string or escape is [`Error::StreamExhausted`].
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let Some(first) = self.src.skip_whitespace()? else {
            return Ok(None);
        };
        let token = match first {
            b'(' => Token::Open,
            b')' => Token::Close,
            b'"' => Token::Str(self.read_string()?),
            other => Token::Atom(self.read_atom(other)?),
        };
        Ok(Some(token))
    }

    /// Read the next token where one is required.
    pub fn expect_token(&mut self) -> Result<Token> {
        self.next_token()?.ok_or(Error::StreamExhausted)
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.src.offset()
    }

    fn read_string(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(STRING_CHUNK);
        loop {
            let b = self.src.next_byte()?.ok_or(Error::StreamExhausted)?;
            match b {
                b'"' => return Ok(buf),
                b'\\' => {
                    let escaped = self.read_escape()?;
                    buf.push(escaped);
                }
                _ => buf.push(b),
            }
            if buf.len() == buf.capacity() {
                buf.try_reserve(STRING_CHUNK)
                    .map_err(|_| Error::AllocationFailure)?;
            }
        }
    }

    fn read_escape(&mut self) -> Result<u8> {
        let b = self.src.next_byte()?.ok_or(Error::StreamExhausted)?;
        match b {
            b't' => Ok(b'\t'),
            b'n' => Ok(b'\n'),
            b'r' => Ok(b'\r'),
            b'0'..=b'9' => {
                let mut value = u32::from(octal_digit(b)?);
                for _ in 0..2 {
                    let d = self.src.next_byte()?.ok_or(Error::StreamExhausted)?;
                    value = (value << 3) | u32::from(octal_digit(d)?);
                }
                u8::try_from(value)
                    .map_err(|_| Error::malformed(format!("octal escape \\{:o} out of range", value)))
            }
            other => Ok(other),
        }
    }

    fn read_atom(&mut self, first: u8) -> Result<String> {
        let mut buf = Vec::with_capacity(ATOM_CHUNK);
        let mut next = Some(first);
        while let Some(b) = next {
            if is_whitespace(b) {
                break;
            }
            match b {
                b')' => {
                    self.src.unread(b);
                    break;
                }
                b'\\' => {
                    let escaped = self.src.next_byte()?.ok_or(Error::StreamExhausted)?;
                    buf.push(escaped);
                }
                _ => buf.push(b),
            }
            next = self.src.next_byte()?;
        }
        String::from_utf8(buf).map_err(|e| Error::Encoding(e.to_string()))
    }
}

fn octal_digit(b: u8) -> Result<u8> {
    match b {
        b'0'..=b'7' => Ok(b - b'0'),
        _ => Err(Error::malformed(format!(
            "'{}' is not an octal digit",
            char::from(b)
        ))),
    }
}

/// What was found where a node may start.
enum NodeStart {
    Open,
    Close,
    End,
}

/// Recursive-descent reader building a [`Tree`] from djvused tokens.
pub struct DjvusedReader<R> {
    tokens: Tokenizer<R>,
    options: ParseOptions,
}

impl<R: BufRead> DjvusedReader<R> {
    /// Create a reader with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParseOptions::default())
    }

    /// Create a reader with custom options.
    pub fn with_options(reader: R, options: ParseOptions) -> Self {
        Self {
            tokens: Tokenizer::new(reader),
            options,
        }
    }

    /// Read one page and return it as a new tree.
    ///
    /// Fails if the stream holds no node at all.
    pub fn read_page(&mut self) -> Result<Tree> {
        let mut tree = Tree::new();
        match self.read_node_start()? {
            NodeStart::Open => {}
            NodeStart::Close => return Err(Error::malformed("unbalanced ')' before any node")),
            NodeStart::End => return Err(Error::StreamExhausted),
        }
        let root = self.read_node_body(&mut tree, None)?;
        tree.set_root(root)?;
        log::debug!(
            "Read {} nodes from {} bytes of djvused",
            tree.len(),
            self.tokens.offset()
        );
        Ok(tree)
    }

    /// Read the next node into `tree`, detached, with `parent` as back-reference.
    ///
    /// Returns `Ok(None)` when the next token is `)` or the stream ended:
    /// there is no further node here. On error nothing read by this call is
    /// left in `tree`.
    pub fn read_node(&mut self, tree: &mut Tree, parent: Option<NodeId>) -> Result<Option<NodeId>> {
        match self.read_node_start()? {
            NodeStart::Open => self.read_node_body(tree, parent).map(Some),
            NodeStart::Close | NodeStart::End => Ok(None),
        }
    }

    fn read_node_start(&mut self) -> Result<NodeStart> {
        loop {
            match self.tokens.next_token()? {
                Some(Token::Open) => return Ok(NodeStart::Open),
                Some(Token::Close) => return Ok(NodeStart::Close),
                None => return Ok(NodeStart::End),
                Some(stray) if self.options.is_lenient() => {
                    log::debug!("Skipping {} outside of a node", stray.describe());
                }
                Some(stray) => {
                    return Err(Error::malformed(format!(
                        "expected '(' but found {}",
                        stray.describe()
                    )));
                }
            }
        }
    }

    /// Everything after the opening `(`.
    fn read_node_body(&mut self, tree: &mut Tree, parent: Option<NodeId>) -> Result<NodeId> {
        let tag = match self.tokens.expect_token()? {
            Token::Atom(tag) => tag,
            other => {
                return Err(Error::malformed(format!(
                    "expected a node type but found {}",
                    other.describe()
                )))
            }
        };
        let level = Level::from_tag(&tag)
            .ok_or_else(|| Error::malformed(format!("unknown node type '{}'", tag)))?;
        if let Some(parent_level) = parent.and_then(|p| tree.level(p)) {
            if parent_level.child() != Some(level) {
                return Err(Error::malformed(format!(
                    "'{}' cannot be nested in '{}'",
                    level, parent_level
                )));
            }
        }

        let node = tree.new_node(level, parent);
        match self.fill_node(tree, node, level) {
            Ok(()) => Ok(node),
            Err(e) => {
                tree.destroy(node);
                Err(e)
            }
        }
    }

    fn fill_node(&mut self, tree: &mut Tree, node: NodeId, level: Level) -> Result<()> {
        let bbox = BoundingBox::new(
            self.read_coord()?,
            self.read_coord()?,
            self.read_coord()?,
            self.read_coord()?,
        );
        tree.set_bbox(node, bbox);

        if level.is_leaf() {
            let text = match self.tokens.expect_token()? {
                Token::Str(bytes) => {
                    String::from_utf8(bytes).map_err(|e| Error::Encoding(e.to_string()))?
                }
                other => {
                    return Err(Error::malformed(format!(
                        "expected word text but found {}",
                        other.describe()
                    )))
                }
            };
            tree.set_text(node, text)?;
            return match self.tokens.expect_token()? {
                Token::Close => Ok(()),
                other => Err(Error::malformed(format!(
                    "expected ')' after word text but found {}",
                    other.describe()
                ))),
            };
        }

        // The child list ends at the container's own ')' (or end of stream).
        while let Some(child) = self.read_node(tree, Some(node))? {
            tree.attach_child(node, child)?;
        }
        Ok(())
    }

    fn read_coord(&mut self) -> Result<f32> {
        match self.tokens.expect_token()? {
            Token::Atom(atom) => atom
                .parse::<u32>()
                .map(|v| v as f32)
                .map_err(|_| Error::malformed(format!("coordinate '{}' is not a number", atom))),
            other => Err(Error::malformed(format!(
                "expected a coordinate but found {}",
                other.describe()
            ))),
        }
    }
}

/// Read one page from a buffered reader.
///
/// Unless `options` ask for the raw layout, container boxes are recomputed
/// from the words with the configured scale and offset.
pub fn read_djvused<R: BufRead>(reader: R, options: ParseOptions) -> Result<Tree> {
    options.validate()?;
    let (recompute, scale, offset) = (options.recompute, options.scale, options.offset);
    let mut tree = DjvusedReader::with_options(reader, options).read_page()?;
    if recompute {
        recompute_with_offset(&mut tree, scale, offset);
    }
    Ok(tree)
}
