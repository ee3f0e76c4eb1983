//! djvused layout converter.

use crate::error::Result;
use crate::model::Tree;
use crate::parser::{read_djvused, ParseOptions};
use crate::TextFormat;

use super::LayoutConverter;

/// Reads djvused hidden-text scripts.
#[derive(Debug, Clone, Default)]
pub struct DjvusedConverter {
    _private: (),
}

impl DjvusedConverter {
    /// Create a new djvused converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl LayoutConverter for DjvusedConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["djvused", "dsed"]
    }

    fn name(&self) -> &str {
        "djvused"
    }

    fn format(&self) -> TextFormat {
        TextFormat::Djvused
    }

    fn read_tree(&self, bytes: &[u8], options: &ParseOptions) -> Result<Tree> {
        read_djvused(bytes, options.clone())
    }
}
