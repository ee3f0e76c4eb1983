//! Layout conversion between text formats.
//!
//! A [`LayoutConverter`] reads one input format into a [`Tree`]; the
//! rendering side is shared by all of them. [`ConverterRegistry`] picks a
//! converter from a file extension or a format name.
//!
//! Output is rendered into memory and written only once rendering has
//! succeeded.
//!
//! # Example
//!
//! ```no_run
//! use pdfsed::convert::{ConvertOptions, ConverterRegistry};
//! use pdfsed::TextFormat;
//! use std::path::Path;
//!
//! fn main() -> pdfsed::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     let options = ConvertOptions::new().with_output_format(TextFormat::Hocr);
//!     let result = registry.convert(Path::new("page-01.djvused"), &options)?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```

mod djvused;

pub use djvused::DjvusedConverter;

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use crate::detect::{detect_format_from_path, TextFormat};
use crate::error::{Error, Result};
use crate::model::Tree;
use crate::parser::ParseOptions;
use crate::render::{render, RenderOptions, TreeStats};

/// Options for layout conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Input format; `None` detects it from the file extension
    pub input_format: Option<TextFormat>,

    /// Parsing options (error mode, scale, offset)
    pub parse: ParseOptions,

    /// Rendering options, including the output format
    pub render: RenderOptions,

    /// Whether to collect tree statistics
    pub collect_stats: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input format instead of detecting it.
    pub fn with_input_format(mut self, format: TextFormat) -> Self {
        self.input_format = Some(format);
        self
    }

    /// Set the output format.
    pub fn with_output_format(mut self, format: TextFormat) -> Self {
        self.render.format = format;
        self
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

/// Result of a layout conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Rendered content
    pub content: String,

    /// Output format
    pub format: TextFormat,

    /// Tree statistics (if collected)
    pub stats: Option<TreeStats>,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Create a new conversion result.
    pub fn new(content: String, format: TextFormat) -> Self {
        Self {
            content,
            format,
            stats: None,
            mime_type: format.mime_type(),
        }
    }

    /// Set tree statistics.
    pub fn with_stats(mut self, stats: TreeStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Reads one text format into a layout tree.
pub trait LayoutConverter: Send + Sync {
    /// Lowercase file extensions without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Name of this converter.
    fn name(&self) -> &str;

    /// Format this converter reads.
    fn format(&self) -> TextFormat;

    /// Parse `bytes` into a tree.
    fn read_tree(&self, bytes: &[u8], options: &ParseOptions) -> Result<Tree>;

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }

    /// Parse `bytes` and render them with `options`.
    fn convert_bytes(&self, bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
        let tree = self.read_tree(bytes, &options.parse)?;
        let content = render(&tree, &options.render)?;
        let mut result = ConvertResult::new(content, options.render.format);
        if options.collect_stats {
            result = result.with_stats(TreeStats::collect(&tree));
        }
        Ok(result)
    }

    /// Convert the file at `path`.
    fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let bytes = fs::read(path)?;
        self.convert_bytes(&bytes, options)
    }
}

/// Registry for layout converters.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn LayoutConverter>>,
    by_name: HashMap<String, Arc<dyn LayoutConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in converters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DjvusedConverter::new()));
        registry
    }

    /// Register a converter for all its extensions.
    pub fn register(&mut self, converter: Arc<dyn LayoutConverter>) {
        for ext in converter.supported_extensions() {
            self.converters.insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name.insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn LayoutConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn LayoutConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Get the converter reading `format`.
    pub fn get_by_format(&self, format: TextFormat) -> Result<Arc<dyn LayoutConverter>> {
        self.by_name
            .values()
            .find(|c| c.format() == format)
            .cloned()
            .ok_or_else(|| Error::Unsupported(format!("reading {} is not supported", format)))
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Convert a file, choosing the converter from the options or the
    /// file extension.
    pub fn convert(&self, path: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
        let format = match options.input_format {
            Some(format) => format,
            None => detect_format_from_path(path)?,
        };
        self.get_by_format(format)?.convert(path, options)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Read a whole layout from `reader`, render it, then write it to `writer`.
///
/// Nothing is written unless reading and rendering both succeed.
pub fn convert_reader<R: BufRead, W: Write>(
    mut reader: R,
    writer: &mut W,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let format = options.input_format.unwrap_or_default();
    let converter = ConverterRegistry::with_defaults().get_by_format(format)?;

    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;
    let result = converter.convert_bytes(&input, options)?;

    writer.write_all(result.content.as_bytes())?;
    writer.flush()?;
    Ok(result)
}

/// Convert `input` and write the result to `output`.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> Result<ConvertResult> {
    let result = ConverterRegistry::with_defaults().convert(input, options)?;
    fs::write(output, result.content.as_bytes())?;
    log::debug!(
        "Wrote {} bytes of {} to {}",
        result.content_len(),
        result.format,
        output.display()
    );
    Ok(result)
}
