//! Geometric primitives shared by pages, lines and words.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
    /// Right edge
    pub right: f64,
    /// Bottom edge
    pub bottom: f64,
}

impl BBox {
    /// Create a box from its four edges.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a box from a `[left, top, right, bottom]` array.
    pub fn from_array(edges: [f64; 4]) -> Self {
        Self::new(edges[0], edges[1], edges[2], edges[3])
    }

    /// Edges as a `[left, top, right, bottom]` array.
    pub fn to_array(&self) -> [f64; 4] {
        [self.left, self.top, self.right, self.bottom]
    }

    /// Width in pixels.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height in pixels.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Union of every box in the iterator, or `None` if it is empty.
    pub fn union_all<'a, I>(boxes: I) -> Option<BBox>
    where
        I: IntoIterator<Item = &'a BBox>,
    {
        boxes
            .into_iter()
            .fold(None, |acc: Option<BBox>, b| match acc {
                Some(u) => Some(u.union(b)),
                None => Some(*b),
            })
    }
}

/// Text baseline as `slope` and `intercept` relative to the line's bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Baseline {
    /// Slope (rise over run)
    pub slope: f64,
    /// Vertical offset from the line box bottom
    pub intercept: f64,
}

impl Baseline {
    /// Create a new baseline.
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    /// Image width
    pub width: f64,
    /// Image height
    pub height: f64,
}

impl Dimensions {
    /// Create new dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pixel offset that places a rotation-corrected line on an unrotated surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleAdjustment {
    /// Horizontal offset
    pub x: f64,
    /// Vertical offset
    pub y: f64,
}

/// The page-level geometry a line needs for rotation math.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageFrame {
    /// Source image dimensions
    pub dims: Dimensions,
    /// Skew-correction angle in degrees
    pub angle: f64,
}
