//! Bottom-up bounding box recalculation.
//!
//! Word boxes are the only measured coordinates; every line, paragraph and
//! column box is derived from them. The page box is left exactly as it was
//! read, whatever the scale.

use super::{BoundingBox, NodeId, Tree};

/// Scale every word by `scale` and re-derive all column, paragraph and line boxes.
///
/// Word coordinates are multiplied and rounded to the nearest integer. Each
/// container box then becomes the union of its children's boxes. A container
/// with no children keeps its own box, scaled like a word.
pub fn recompute_and_scale(tree: &mut Tree, scale: f32) {
    recompute_with_offset(tree, scale, (0.0, 0.0));
}

/// Like [`recompute_and_scale`], shifting scaled word boxes by `offset` first.
///
/// djvused coordinates are unsigned, so shifted coordinates are clamped at 0.
pub fn recompute_with_offset(tree: &mut Tree, scale: f32, offset: (f32, f32)) {
    let Some(root) = tree.root() else {
        return;
    };
    let pass = Pass { scale, offset };

    let mut updated = 0;
    for column in tree.children(root).to_vec() {
        pass.visit(tree, column, &mut updated);
    }

    log::debug!(
        "Recomputed {} boxes (scale {:.3}, offset {:?})",
        updated,
        scale,
        offset
    );
}

struct Pass {
    scale: f32,
    offset: (f32, f32),
}

impl Pass {
    fn adjust(&self, bbox: BoundingBox) -> BoundingBox {
        bbox.scaled(self.scale)
            .translated(self.offset.0, self.offset.1)
            .clamped_non_negative()
    }

    /// Recompute `id` and its subtree, returning the new box.
    fn visit(&self, tree: &mut Tree, id: NodeId, updated: &mut usize) -> Option<BoundingBox> {
        let node = tree.get(id)?;
        let prior = node.bbox;

        let bbox = if node.is_leaf() || node.children().is_empty() {
            self.adjust(prior)
        } else {
            let children = node.children().to_vec();
            let boxes: Vec<BoundingBox> = children
                .into_iter()
                .filter_map(|child| self.visit(tree, child, updated))
                .collect();
            BoundingBox::union_all(boxes).unwrap_or_else(|| self.adjust(prior))
        };

        tree.set_bbox(id, bbox);
        *updated += 1;
        Some(bbox)
    }
}
