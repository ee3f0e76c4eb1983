//! JSON rendering for layouts.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{BoundingBox, Level, NodeId, Tree};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[derive(Serialize)]
struct JsonNode<'a> {
    level: Level,
    bbox: BoundingBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<JsonNode<'a>>>,
}

impl<'a> JsonNode<'a> {
    fn build(tree: &'a Tree, id: NodeId) -> Result<Self> {
        let node = tree
            .get(id)
            .ok_or_else(|| Error::Render("dangling node id".to_string()))?;
        let children = if node.is_leaf() {
            None
        } else {
            Some(
                node.children()
                    .iter()
                    .map(|&child| JsonNode::build(tree, child))
                    .collect::<Result<Vec<_>>>()?,
            )
        };
        Ok(Self {
            level: node.level,
            bbox: node.bbox,
            text: node.text(),
            children,
        })
    }
}

/// Convert a layout to JSON.
pub fn to_json(tree: &Tree, format: JsonFormat) -> Result<String> {
    let root = tree.root().ok_or(Error::EmptyTree)?;
    let view = JsonNode::build(tree, root)?;

    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&view),
        JsonFormat::Compact => serde_json::to_string(&view),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
