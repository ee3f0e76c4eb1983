//! Bounding boxes.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box: left, top, right, bottom.
///
/// No ordering is enforced between the corners. Input normally has
/// `x1 <= x2` and `y1 <= y2`, but nothing here checks it, and an inverted box
/// makes [`BoundingBox::union`] and [`BoundingBox::contains`] meaningless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
}

impl BoundingBox {
    /// Create a box from its four edges.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Fold [`union`](Self::union) over a sequence of boxes.
    ///
    /// Returns `None` for an empty sequence.
    pub fn union_all<I>(boxes: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = BoundingBox>,
    {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    /// Multiply every coordinate by `factor`, rounding to the nearest integer.
    pub fn scaled(&self, factor: f32) -> BoundingBox {
        BoundingBox {
            x1: (self.x1 * factor).round(),
            y1: (self.y1 * factor).round(),
            x2: (self.x2 * factor).round(),
            y2: (self.y2 * factor).round(),
        }
    }

    /// Shift the box by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> BoundingBox {
        BoundingBox {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// Raise negative coordinates to zero.
    pub fn clamped_non_negative(&self) -> BoundingBox {
        BoundingBox {
            x1: self.x1.max(0.0),
            y1: self.y1.max(0.0),
            x2: self.x2.max(0.0),
            y2: self.y2.max(0.0),
        }
    }

    /// Mirror the vertical axis against a page of height `page_height`.
    ///
    /// Top and bottom swap so the result stays ordered.
    pub fn flipped(&self, page_height: f32) -> BoundingBox {
        BoundingBox {
            x1: self.x1,
            y1: page_height - self.y2,
            x2: self.x2,
            y2: page_height - self.y1,
        }
    }

    /// Check whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.x1 <= other.x1 && self.y1 <= other.y1 && self.x2 >= other.x2 && self.y2 >= other.y2
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Coordinates truncated toward zero, as written to text formats.
    pub fn to_int_coords(&self) -> [i64; 4] {
        [
            self.x1 as i64,
            self.y1 as i64,
            self.x2 as i64,
            self.y2 as i64,
        ]
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x1, y1, x2, y2] = self.to_int_coords();
        write!(f, "{} {} {} {}", x1, y1, x2, y2)
    }
}
