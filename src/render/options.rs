//! Rendering options and configuration.

use crate::detect::TextFormat;

/// Options for rendering a layout.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output format
    pub format: TextFormat,

    /// Spaces per nesting level (djvused and hOCR)
    pub indent: usize,

    /// Document title written into the hOCR head
    pub title: Option<String>,

    /// JSON layout when rendering to JSON
    pub json_format: super::JsonFormat,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format.
    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the indentation width.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set the hOCR document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: super::JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: TextFormat::Djvused,
            indent: 2,
            title: None,
            json_format: super::JsonFormat::Pretty,
        }
    }
}
