//! Integer rectangle used for source and destination areas.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixels. `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns `true` if the point lies inside the rectangle.
    ///
    /// The left/top edges are inclusive, the right/bottom edges exclusive.
    /// Edges are compared in `i64`, so a rectangle reaching past `i32::MAX`
    /// still answers correctly.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        let (px, py) = (i64::from(px), i64::from(py));
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        px >= x && px < x + i64::from(self.w) && py >= y && py < y + i64::from(self.h)
    }

    /// Center point as floating point coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.w as f64 / 2.0,
            self.y as f64 + self.h as f64 / 2.0,
        )
    }
}
