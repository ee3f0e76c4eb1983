//! Rendering module for converting layouts to various output formats.

mod djvused;
mod hocr;
mod json;
mod options;
mod result;
mod text;

pub use djvused::{quote, to_djvused, write_djvused, write_quoted};
pub use hocr::{from_hocr, to_hocr};
pub use json::{to_json, JsonFormat};
pub use options::RenderOptions;
pub use result::{RenderResult, TreeStats};
pub use text::{from_text, to_text};

use crate::detect::TextFormat;
use crate::error::Result;
use crate::model::Tree;

/// Render a layout in the format selected by `options`.
pub fn render(tree: &Tree, options: &RenderOptions) -> Result<String> {
    match options.format {
        TextFormat::Djvused => to_djvused(tree, options),
        TextFormat::Hocr => to_hocr(tree, options),
        TextFormat::Text => to_text(tree),
        TextFormat::Json => to_json(tree, options.json_format),
    }
}

/// Render a layout and collect its statistics.
pub fn render_with_stats(tree: &Tree, options: &RenderOptions) -> Result<RenderResult> {
    let content = render(tree, options)?;
    Ok(RenderResult::new(content, TreeStats::collect(tree)))
}
