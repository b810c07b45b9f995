// THEORY:
// `BoundingRect` is the only data record the locator produces per frame. It is the
// smallest axis-aligned rectangle enclosing a region of the color mask, expressed in
// pixel coordinates of the cropped frame (origin top-left). Extents are inclusive:
// a region made of one pixel has width 1 and height 1, so `area` counts pixels of
// the enclosing box.

use imageproc::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The smallest rectangle enclosing every point. `None` for an empty slice.
    pub fn from_points(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for point in &points[1..] {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Real-valued center of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Bottom-right corner, exclusive.
    pub fn far_corner(&self) -> (i32, i32) {
        (self.x + self.width, self.y + self.height)
    }
}
