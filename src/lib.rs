//! # pdfsed
//!
//! Positioned-OCR layouts and composition scripts for building searchable PDFs
//! from scanned pages.
//!
//! A layout is a five-level tree (page, column, paragraph, line, word) where
//! every node carries a bounding box and words carry text. This crate reads
//! layouts from djvused hidden-text scripts, recomputes and scales their
//! boxes, and writes them back as djvused, hOCR, plain text or JSON. It also
//! reads pdfsed composition scripts into typed commands for a PDF renderer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsed::{parse_file, render};
//!
//! fn main() -> pdfsed::Result<()> {
//!     let tree = parse_file("page-01.djvused")?;
//!     let hocr = render::to_hocr(&tree, &render::RenderOptions::default())?;
//!     println!("{}", hocr);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **djvused codec**: reader and writer with full escape handling
//! - **Box recompute**: bottom-up unions with scale and offset
//! - **Output formats**: djvused, hOCR, plain text, JSON
//! - **Scripts**: lexer and command reader for pdfsed scripts

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod script;
pub mod source;

// Re-export commonly used types
pub use convert::{ConvertOptions, ConvertResult, ConverterRegistry, LayoutConverter};
pub use detect::{detect_format_from_bytes, detect_format_from_path, TextFormat};
pub use error::{Error, Result};
pub use model::{
    recompute_and_scale, recompute_with_offset, BoundingBox, Content, Level, Node, NodeId, Tree,
};
pub use parser::{read_djvused, DjvusedReader, ErrorMode, ParseOptions};
pub use render::{JsonFormat, RenderOptions, TreeStats};
pub use script::{Atom, Command, ScriptLexer, ScriptOptions, ScriptReader};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse a djvused file into a layout tree.
///
/// Container boxes are recomputed from the words, as with
/// [`ParseOptions::default`].
///
/// # Example
///
/// ```no_run
/// use pdfsed::parse_file;
///
/// let tree = parse_file("page-01.djvused").unwrap();
/// println!("Nodes: {}", tree.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Tree> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse a djvused file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfsed::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient().with_scale(0.5);
/// let tree = parse_file_with_options("page-01.djvused", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Tree> {
    let file = File::open(path)?;
    read_djvused(BufReader::new(file), options)
}

/// Parse djvused from a string.
pub fn parse_str(input: &str) -> Result<Tree> {
    read_djvused(input.as_bytes(), ParseOptions::default())
}

/// Parse djvused from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Tree> {
    read_djvused(data, ParseOptions::default())
}

/// Parse djvused from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Tree> {
    read_djvused(data, options)
}

/// Parse djvused from a buffered reader.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Tree> {
    read_djvused(reader, ParseOptions::default())
}

/// Read every command of a pdfsed script file.
///
/// Relative file names in the script are resolved against the script's own
/// directory.
///
/// # Example
///
/// ```no_run
/// use pdfsed::{parse_script_file, Command};
///
/// for command in parse_script_file("book.pdfsed").unwrap() {
///     if let Command::DrawText(text) = command {
///         println!("hidden text from {}", text.path.display());
///     }
/// }
/// ```
pub fn parse_script_file<P: AsRef<Path>>(path: P) -> Result<Vec<Command>> {
    let path = path.as_ref();
    let mut options = ScriptOptions::new();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        options = options.with_base_dir(dir);
    }
    let file = File::open(path)?;
    script::read_script(BufReader::new(file), options)
}

/// Convert a djvused file to djvused with recomputed boxes.
pub fn to_djvused<P: AsRef<Path>>(path: P) -> Result<String> {
    let tree = parse_file(path)?;
    render::to_djvused(&tree, &RenderOptions::default())
}

/// Convert a djvused file to hOCR.
pub fn to_hocr<P: AsRef<Path>>(path: P) -> Result<String> {
    let tree = parse_file(path)?;
    render::to_hocr(&tree, &RenderOptions::default())
}

/// Extract plain text from a djvused file.
///
/// # Example
///
/// ```no_run
/// use pdfsed::to_text;
///
/// let text = to_text("page-01.djvused").unwrap();
/// println!("{}", text);
/// ```
pub fn to_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let tree = parse_file(path)?;
    render::to_text(&tree)
}

/// Convert a djvused file to JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let tree = parse_file(path)?;
    render::to_json(&tree, format)
}

/// Builder for reading and converting layouts.
///
/// # Example
///
/// ```no_run
/// use pdfsed::{Pdfsed, TextFormat};
///
/// let hocr = Pdfsed::new()
///     .lenient()
///     .with_scale(0.5)
///     .parse("page-01.djvused")?
///     .render(TextFormat::Hocr)?;
/// # Ok::<(), pdfsed::Error>(())
/// ```
pub struct Pdfsed {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Pdfsed {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Keep boxes as read instead of recomputing them.
    pub fn raw(mut self) -> Self {
        self.parse_options = self.parse_options.raw();
        self
    }

    /// Scale word coordinates.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.parse_options = self.parse_options.with_scale(scale);
        self
    }

    /// Shift word coordinates after scaling.
    pub fn with_offset(mut self, dx: f32, dy: f32) -> Self {
        self.parse_options = self.parse_options.with_offset(dx, dy);
        self
    }

    /// Set the indentation used by djvused and hOCR output.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.render_options = self.render_options.with_indent(indent);
        self
    }

    /// Set the hOCR document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_title(title);
        self
    }

    /// Parse a djvused file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<PdfsedResult> {
        let tree = parse_file_with_options(path, self.parse_options)?;
        Ok(PdfsedResult {
            tree,
            render_options: self.render_options,
        })
    }

    /// Parse djvused from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<PdfsedResult> {
        let tree = read_djvused(data, self.parse_options)?;
        Ok(PdfsedResult {
            tree,
            render_options: self.render_options,
        })
    }
}

impl Default for Pdfsed {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed layout with the render options chosen on the builder.
pub struct PdfsedResult {
    /// The parsed layout
    pub tree: Tree,
    render_options: RenderOptions,
}

impl PdfsedResult {
    /// Render in the given format.
    pub fn render(&self, format: TextFormat) -> Result<String> {
        let options = self.render_options.clone().with_format(format);
        render::render(&self.tree, &options)
    }

    /// Convert to djvused.
    pub fn to_djvused(&self) -> Result<String> {
        render::to_djvused(&self.tree, &self.render_options)
    }

    /// Convert to hOCR.
    pub fn to_hocr(&self) -> Result<String> {
        render::to_hocr(&self.tree, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.tree)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.tree, format)
    }

    /// Node counts of the layout.
    pub fn stats(&self) -> TreeStats {
        TreeStats::collect(&self.tree)
    }

    /// Get the layout tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &[u8] = b"(page 0 0 200 100 (column 0 0 200 100 (para 0 0 200 100 \
        (line 0 0 200 100 (word 10 10 20 20 \"ab\") (word 30 10 50 20 \"cd\")))))";

    #[test]
    fn test_pdfsed_builder() {
        let builder = Pdfsed::new().lenient().with_scale(2.0).with_indent(4);

        assert_eq!(builder.parse_options.error_mode, ErrorMode::Lenient);
        assert_eq!(builder.parse_options.scale, 2.0);
        assert!(builder.parse_options.recompute);
        assert_eq!(builder.render_options.indent, 4);
    }

    #[test]
    fn test_pdfsed_builder_raw() {
        let builder = Pdfsed::default().raw();
        assert!(!builder.parse_options.recompute);
    }

    #[test]
    fn test_builder_parse_bytes() {
        let result = Pdfsed::new().with_scale(2.0).parse_bytes(PAGE).unwrap();
        let line = result.tree().nodes_at(Level::Line)[0];
        assert_eq!(
            result.tree().bbox(line),
            Some(BoundingBox::new(20.0, 20.0, 100.0, 40.0))
        );
        assert_eq!(result.to_text().unwrap(), "ab cd\n");
        assert_eq!(result.stats().word_count, 2);
        assert!(result.render(TextFormat::Hocr).unwrap().contains("ocrx_word"));
    }

    #[test]
    fn test_builder_invalid_scale() {
        let result = Pdfsed::new().with_scale(0.0).parse_bytes(PAGE);
        assert!(matches!(result, Err(Error::InvalidScale(_))));
    }

    #[test]
    fn test_parse_bytes_empty_data() {
        assert!(matches!(parse_bytes(b""), Err(Error::StreamExhausted)));
    }

    #[test]
    fn test_parse_bytes_not_djvused() {
        assert!(parse_bytes(b"<!DOCTYPE html>").is_err());
    }

    #[test]
    fn test_parse_str() {
        let tree = parse_str("(page 0 0 1 1)").unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.level(tree.root().unwrap()), Some(Level::Page));
    }

    #[test]
    fn test_parse_missing_file() {
        assert!(matches!(
            parse_file("/nonexistent/page.djvused"),
            Err(Error::Io(_))
        ));
    }
}
