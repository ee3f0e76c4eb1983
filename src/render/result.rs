//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

use crate::model::{BoundingBox, Level, Tree};

/// Result of rendering a layout, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content
    pub content: String,

    /// Layout statistics
    pub stats: TreeStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: TreeStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Counts of the nodes in a layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Page box, if the tree has a root
    pub page: Option<BoundingBox>,

    /// Number of columns
    pub column_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of lines
    pub line_count: u32,

    /// Number of words
    pub word_count: u32,

    /// Characters across all words
    pub char_count: u32,
}

impl TreeStats {
    /// Collect statistics from a tree.
    pub fn collect(tree: &Tree) -> Self {
        let mut stats = Self::default();
        let Some(root) = tree.root() else {
            return stats;
        };
        stats.page = tree.bbox(root);

        for id in tree.descendants(root) {
            let Some(node) = tree.get(id) else {
                continue;
            };
            match node.level {
                Level::Page => {}
                Level::Column => stats.column_count += 1,
                Level::Paragraph => stats.paragraph_count += 1,
                Level::Line => stats.line_count += 1,
                Level::Word => {
                    stats.word_count += 1;
                    stats.char_count += node.text().map_or(0, |t| t.chars().count()) as u32;
                }
            }
        }
        stats
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &TreeStats) {
        self.page = match (self.page, other.page) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        };
        self.column_count += other.column_count;
        self.paragraph_count += other.paragraph_count;
        self.line_count += other.line_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_stats() {
        let mut tree = Tree::with_page(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        let page = tree.root().unwrap();
        let column = tree.new_node(Level::Column, Some(page));
        tree.attach_child(page, column).unwrap();
        let para = tree.new_node(Level::Paragraph, Some(column));
        tree.attach_child(column, para).unwrap();
        let line = tree.new_node(Level::Line, Some(para));
        tree.attach_child(para, line).unwrap();
        for text in ["héllo", "you"] {
            let word = tree.new_word(Some(line), text);
            tree.attach_child(line, word).unwrap();
        }

        let stats = TreeStats::collect(&tree);
        assert_eq!(stats.page, Some(BoundingBox::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(stats.column_count, 1);
        assert_eq!(stats.paragraph_count, 1);
        assert_eq!(stats.line_count, 1);
        assert_eq!(stats.word_count, 2);
        assert_eq!(stats.char_count, 8);
    }

    #[test]
    fn test_collect_empty_tree() {
        assert_eq!(TreeStats::collect(&Tree::new()), TreeStats::default());
    }

    #[test]
    fn test_merge() {
        let mut a = TreeStats {
            word_count: 2,
            ..Default::default()
        };
        let b = TreeStats {
            page: Some(BoundingBox::new(0.0, 0.0, 5.0, 5.0)),
            word_count: 3,
            line_count: 1,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.word_count, 5);
        assert_eq!(a.line_count, 1);
        assert_eq!(a.page, b.page);
    }

    #[test]
    fn test_render_result() {
        let result = RenderResult::new("abc".to_string(), TreeStats::default());
        assert_eq!(result.content_len(), 3);
    }
}
