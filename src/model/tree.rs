//! Layout tree.
//!
//! A [`Tree`] owns every node of one page in a generational arena. Nodes refer
//! to each other through [`NodeId`]s: a container lists its children in reading
//! order, and every node keeps a non-owning back-reference to its parent.
//! Destroying a node bumps the generation of its slot, so a stale id never
//! resolves to a node allocated later in the same slot.

use serde::{Deserialize, Serialize};

use super::BoundingBox;
use crate::error::{Error, Result};

/// Handle to a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// The five fixed levels of a positioned OCR page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Whole page
    Page,
    /// Column, text area
    Column,
    /// Paragraph
    Paragraph,
    /// Line of text
    Line,
    /// Single word, always a leaf
    Word,
}

impl Level {
    /// All levels, outermost first.
    pub const ALL: [Level; 5] = [
        Level::Page,
        Level::Column,
        Level::Paragraph,
        Level::Line,
        Level::Word,
    ];

    /// Tag used for this level in djvused scripts.
    pub fn tag(&self) -> &'static str {
        match self {
            Level::Page => "page",
            Level::Column => "column",
            Level::Paragraph => "para",
            Level::Line => "line",
            Level::Word => "word",
        }
    }

    /// Look a level up by its djvused tag.
    pub fn from_tag(tag: &str) -> Option<Level> {
        Level::ALL.into_iter().find(|level| level.tag() == tag)
    }

    /// Level expected for the children of this level.
    pub fn child(&self) -> Option<Level> {
        match self {
            Level::Page => Some(Level::Column),
            Level::Column => Some(Level::Paragraph),
            Level::Paragraph => Some(Level::Line),
            Level::Line => Some(Level::Word),
            Level::Word => None,
        }
    }

    /// Check if nodes of this level are leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Level::Word)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// What a node owns.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Literal text of a word
    Text(String),
    /// Children in reading order
    Children(Vec<NodeId>),
}

/// A single node of the layout tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Hierarchy level
    pub level: Level,
    /// Bounding box
    pub bbox: BoundingBox,
    parent: Option<NodeId>,
    content: Content,
}

impl Node {
    fn new(level: Level, parent: Option<NodeId>) -> Self {
        let content = if level.is_leaf() {
            Content::Text(String::new())
        } else {
            Content::Children(Vec::new())
        };
        Self {
            level,
            bbox: BoundingBox::default(),
            parent,
            content,
        }
    }

    /// Parent back-reference, `None` for a root or detached node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Owned content.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Word text, `None` for containers.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Children(_) => None,
        }
    }

    /// Child ids, empty for words.
    pub fn children(&self) -> &[NodeId] {
        match &self.content {
            Content::Children(children) => children,
            Content::Text(_) => &[],
        }
    }

    /// Check if this node is a word leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, Content::Text(_))
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena owning the nodes of one page.
#[derive(Default)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    root: Option<NodeId>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree with a single page node as root.
    pub fn with_page(bbox: BoundingBox) -> Self {
        let mut tree = Self::new();
        let page = tree.new_node(Level::Page, None);
        tree.set_bbox(page, bbox);
        tree.root = Some(page);
        tree
    }

    /// Root page, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Set the root node.
    pub fn set_root(&mut self, id: NodeId) -> Result<()> {
        self.get(id).ok_or_else(|| stale(id))?;
        self.root = Some(id);
        Ok(())
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // ---------------------------------------------------------------------
    // Creation and linking
    // ---------------------------------------------------------------------

    /// Create an unattached node with a zero box and no content.
    ///
    /// `parent` is recorded as the back-reference only; the caller links the
    /// node with [`attach_child`](Self::attach_child) or
    /// [`append_sibling`](Self::append_sibling).
    pub fn new_node(&mut self, level: Level, parent: Option<NodeId>) -> NodeId {
        let node = Node::new(level, parent);
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Create an unattached word with the given text.
    pub fn new_word(&mut self, parent: Option<NodeId>, text: impl Into<String>) -> NodeId {
        let id = self.new_node(Level::Word, parent);
        if let Some(node) = self.get_mut(id) {
            node.content = Content::Text(text.into());
        }
        id
    }

    /// Append `child` to the end of `parent`'s children and point it back at `parent`.
    ///
    /// The child must sit exactly one level below the parent.
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let child_level = self.get(child).ok_or_else(|| stale(child))?.level;
        let parent_level = self.get(parent).ok_or_else(|| stale(parent))?.level;
        if !parent_level.is_leaf() && parent_level.child() != Some(child_level) {
            return Err(Error::malformed(format!(
                "'{}' cannot be nested in '{}'",
                child_level, parent_level
            )));
        }
        match self.get_mut(parent).map(|node| &mut node.content) {
            Some(Content::Children(children)) => children.push(child),
            Some(Content::Text(_)) => {
                return Err(Error::malformed("a word cannot have children"));
            }
            None => return Err(stale(parent)),
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Insert `sibling` directly after `node` in the parent's children.
    pub fn append_sibling(&mut self, node: NodeId, sibling: NodeId) -> Result<()> {
        let sibling_level = self.get(sibling).ok_or_else(|| stale(sibling))?.level;
        let current = self.get(node).ok_or_else(|| stale(node))?;
        if current.level != sibling_level {
            return Err(Error::malformed(format!(
                "'{}' cannot be a sibling of '{}'",
                sibling_level, current.level
            )));
        }
        let parent = current
            .parent
            .ok_or_else(|| Error::malformed("cannot add a sibling to a detached node"))?;

        match self.get_mut(parent).map(|p| &mut p.content) {
            Some(Content::Children(children)) => {
                let at = children
                    .iter()
                    .position(|&c| c == node)
                    .map(|i| i + 1)
                    .unwrap_or(children.len());
                children.insert(at, sibling);
            }
            _ => return Err(stale(parent)),
        }
        if let Some(sib) = self.get_mut(sibling) {
            sib.parent = Some(parent);
        }
        Ok(())
    }

    /// Recursively free `id` and everything it owns.
    ///
    /// The node is unlinked from its parent's children first. Missing links
    /// are tolerated, so a half-built subtree can be released. Returns the
    /// number of nodes freed.
    pub fn destroy(&mut self, id: NodeId) -> usize {
        if let Some(parent) = self.get(id).and_then(|n| n.parent) {
            if let Some(Content::Children(children)) = self.get_mut(parent).map(|p| &mut p.content)
            {
                children.retain(|&c| c != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
        self.free_subtree(id)
    }

    fn free_subtree(&mut self, id: NodeId) -> usize {
        let Some(node) = self.take(id) else {
            return 0;
        };
        let mut freed = 1;
        if let Content::Children(children) = node.content {
            for child in children {
                freed += self.free_subtree(child);
            }
        }
        freed
    }

    fn take(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(node)
    }

    // ---------------------------------------------------------------------
    // Access
    // ---------------------------------------------------------------------

    /// Look a node up, `None` if it was destroyed.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Check if `id` still refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Children of `id` in reading order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Level of `id`.
    pub fn level(&self, id: NodeId) -> Option<Level> {
        self.get(id).map(|n| n.level)
    }

    /// Box of `id`.
    pub fn bbox(&self, id: NodeId) -> Option<BoundingBox> {
        self.get(id).map(|n| n.bbox)
    }

    /// Replace the box of `id`.
    pub fn set_bbox(&mut self, id: NodeId, bbox: BoundingBox) {
        if let Some(node) = self.get_mut(id) {
            node.bbox = bbox;
        }
    }

    /// Text of a word.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::text)
    }

    /// Replace the text of a word.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        match self.get_mut(id).map(|n| &mut n.content) {
            Some(Content::Text(current)) => {
                *current = text.into();
                Ok(())
            }
            Some(Content::Children(_)) => Err(Error::malformed("only words carry text")),
            None => Err(stale(id)),
        }
    }

    /// Depth-first, pre-order walk of the subtree rooted at `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// All nodes of `level` under the root, in reading order.
    pub fn nodes_at(&self, level: Level) -> Vec<NodeId> {
        match self.root {
            Some(root) => self
                .descendants(root)
                .filter(|&id| self.level(id) == Some(level))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Structural equality: same levels, boxes and word text in the same order.
    pub fn same_structure(&self, other: &Tree) -> bool {
        match (self.root, other.root) {
            (Some(a), Some(b)) => self.same_subtree(a, other, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn same_subtree(&self, a: NodeId, other: &Tree, b: NodeId) -> bool {
        let (Some(na), Some(nb)) = (self.get(a), other.get(b)) else {
            return false;
        };
        if na.level != nb.level || na.bbox != nb.bbox || na.text() != nb.text() {
            return false;
        }
        let (ca, cb) = (na.children(), nb.children());
        ca.len() == cb.len()
            && ca
                .iter()
                .zip(cb)
                .all(|(&x, &y)| self.same_subtree(x, other, y))
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("root", &self.root)
            .finish()
    }
}

/// Iterator returned by [`Tree::descendants`].
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

fn stale(id: NodeId) -> Error {
    Error::malformed(format!("node {}:{} does not exist", id.index, id.generation))
}
