//! Percentage-space rectangles and overlap tests
//!
//! Everything in the play-field is addressed as a percentage of the field's
//! width/height, so collisions are independent of the actual pixel size.

use serde::{Deserialize, Serialize};

/// An absolute bounding box (pixels), as reported by the host layout
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// A rectangle in play-field percentages
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PercentRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Contract the rectangle by `amount` on every side
    ///
    /// A negative amount grows it instead.
    pub fn shrink(&self, amount: f32) -> Self {
        Self {
            left: self.left + amount,
            top: self.top + amount,
            width: self.width - amount * 2.0,
            height: self.height - amount * 2.0,
        }
    }
}

/// Express `element` as percentages of `container`
///
/// A degenerate (zero-sized) container yields a zero rect rather than NaN/inf.
pub fn rect_percent(element: Bounds, container: Bounds) -> PercentRect {
    if container.width <= 0.0 || container.height <= 0.0 {
        return PercentRect::default();
    }
    PercentRect {
        left: (element.left - container.left) / container.width * 100.0,
        top: (element.top - container.top) / container.height * 100.0,
        width: element.width / container.width * 100.0,
        height: element.height / container.height * 100.0,
    }
}

/// Axis-aligned overlap test
///
/// Touching edges count as overlap.
#[inline]
pub fn intersects(a: &PercentRect, b: &PercentRect) -> bool {
    !(a.right() < b.left || b.right() < a.left || a.bottom() < b.top || b.bottom() < a.top)
}
