//! Edge-based rectangles
//!
//! The toolbar reasons about the location bar by its edges rather than by
//! origin and size, so rectangles here store `left`, `top`, `right`, `bottom`.

use serde::{Deserialize, Serialize};

/// A rectangle described by its four edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// An all-zero rectangle, also used as "no offset"
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Horizontal center
    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    /// Check if the rectangle encloses no area
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Check if a point is within the rectangle bounds
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Edge-wise sum, used to apply an offset rectangle on top of bounds
    pub fn offset_by(&self, offset: &Rect) -> Rect {
        Rect::new(
            self.left + offset.left,
            self.top + offset.top,
            self.right + offset.right,
            self.bottom + offset.bottom,
        )
    }

    /// Edge-wise difference `self - other`
    pub fn delta_from(&self, other: &Rect) -> Rect {
        Rect::new(
            self.left - other.left,
            self.top - other.top,
            self.right - other.right,
            self.bottom - other.bottom,
        )
    }

    /// Multiply every edge by `factor`
    pub fn scaled(&self, factor: f32) -> Rect {
        Rect::new(
            self.left * factor,
            self.top * factor,
            self.right * factor,
            self.bottom * factor,
        )
    }

    /// Translate the whole rectangle
    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let r = Rect::new(10.0, 5.0, 110.0, 45.0);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 40.0);
        assert_eq!(r.center_x(), 60.0);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_empty() {
        assert!(Rect::zero().is_empty());
        assert!(Rect::new(20.0, 0.0, 10.0, 40.0).is_empty());
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(0.0, 0.0, 100.0, 40.0);
        assert!(r.contains(50.0, 20.0));
        assert!(r.contains(100.0, 40.0));
        assert!(!r.contains(101.0, 20.0));
    }

    #[test]
    fn test_offset_and_delta() {
        let bounds = Rect::new(50.0, 0.0, 250.0, 40.0);
        let offset = Rect::new(10.0, 0.0, -10.0, 0.0);
        let moved = bounds.offset_by(&offset);
        assert_eq!(moved, Rect::new(60.0, 0.0, 240.0, 40.0));
        assert_eq!(moved.delta_from(&bounds), offset);
    }

    #[test]
    fn test_scaled_to_zero() {
        let offset = Rect::new(10.0, 4.0, -10.0, 4.0);
        assert_eq!(offset.scaled(0.0), Rect::zero());
        assert_eq!(offset.scaled(0.5), Rect::new(5.0, 2.0, -5.0, 2.0));
    }
}
