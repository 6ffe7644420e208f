//! Rectangle and size primitives in CSS pixel space.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// A point in viewport coordinates.
pub struct Point {
    /// Distance from the viewport top edge.
    pub top: f64,
    /// Distance from the viewport left edge.
    pub left: f64,
}

impl Point {
    /// Creates a point from `top`/`left` coordinates.
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Width/height pair.
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Client rectangle as reported by `getBoundingClientRect()`.
pub struct Rect {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    /// Size of the rectangle.
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns `true` for the all-zero rect reported by detached or `display: none` elements.
    pub fn is_degenerate(self) -> bool {
        self.top == 0.0 && self.left == 0.0 && self.right() == 0.0 && self.bottom() == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_derive_from_origin_and_size() {
        let rect = Rect::new(500.0, 500.0, 100.0, 20.0);
        assert_eq!(rect.right(), 600.0);
        assert_eq!(rect.bottom(), 520.0);
        assert!(!rect.is_degenerate());
        assert!(Rect::default().is_degenerate());
    }
}
