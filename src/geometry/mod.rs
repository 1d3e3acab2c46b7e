//! Geometry primitives and the position solver.
//!
//! Everything in this module is pure: the solver maps a position descriptor
//! plus a monitor table to an absolute rectangle, with no platform calls.
//! All values are virtual-desktop logical pixels with a top-left origin.

mod position;
mod solver;

pub use position::PositionDescriptor;
pub use solver::{Placement, solve};

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the rectangle's center point.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Checks whether a point lies within the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom exclusive,
    /// so adjacent rectangles never both claim a shared edge.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Bottom edge coordinate.
    #[must_use]
    pub fn bottom(&self) -> f64 { self.y + self.height }

    /// Right edge coordinate.
    #[must_use]
    pub fn right(&self) -> f64 { self.x + self.width }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.center(), (60.0, 45.0));
    }

    #[test]
    fn test_contains_interior_point() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(rect.contains(50.0, 50.0));
        assert!(rect.contains(0.0, 0.0));
    }

    #[test]
    fn test_contains_excludes_far_edges() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(!rect.contains(100.0, 50.0));
        assert!(!rect.contains(50.0, 100.0));
    }

    #[test]
    fn test_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let rect = Rect::new(1.5, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&rect).unwrap();
        assert!(json.contains(r#""width":3.0"#));
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rect);
    }
}
