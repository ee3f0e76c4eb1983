//! Layout model for positioned OCR content.
//!
//! A page is a fixed five-level hierarchy (page, column, paragraph, line,
//! word). Every node carries a bounding box; words carry their text.

mod bbox;
mod recompute;
mod tree;

pub use bbox::BoundingBox;
pub use recompute::{recompute_and_scale, recompute_with_offset};
pub use tree::{Content, Descendants, Level, Node, NodeId, Tree};
