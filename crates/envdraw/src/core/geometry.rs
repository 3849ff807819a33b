//! Canvas geometry
//!
//! Integer points and rectangles in canvas units, plus the grid helpers shared
//! by placement and routing. The grid step is fixed at [`GRID_STEP`] units.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discretization unit for placement and routing
pub const GRID_STEP: i32 = 10;

/// A point in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by the given offsets
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance to another point
    pub fn manhattan(self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Snap both coordinates to the nearest grid line (ties round up)
    pub fn snapped(self) -> Self {
        Self {
            x: snap(self.x),
            y: snap(self.y),
        }
    }

    /// Snap both coordinates down to the grid line at or below them
    pub fn floored(self) -> Self {
        Self {
            x: floor_to_grid(self.x),
            y: floor_to_grid(self.y),
        }
    }

    /// True when both coordinates lie on grid lines
    pub fn is_grid_aligned(self) -> bool {
        self.x.rem_euclid(GRID_STEP) == 0 && self.y.rem_euclid(GRID_STEP) == 0
    }

    /// True when the two points share an x or a y coordinate
    pub fn is_orthogonal_to(self, other: Point) -> bool {
        self.x == other.x || self.y == other.y
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Round a coordinate to the nearest grid line
pub fn snap(value: i32) -> i32 {
    (value + GRID_STEP / 2).div_euclid(GRID_STEP) * GRID_STEP
}

/// Round a coordinate down to a grid line
pub fn floor_to_grid(value: i32) -> i32 {
    value.div_euclid(GRID_STEP) * GRID_STEP
}

/// Axis-aligned rectangle with inclusive edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Rect {
    /// Create a rectangle from two corners in any order
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Rectangle with its top-left corner at `origin`
    pub fn from_origin(origin: Point, width: i32, height: i32) -> Self {
        Self::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    /// Square of the given half extent centred on `center`
    pub fn around(center: Point, half_extent: i32) -> Self {
        Self::new(
            center.x - half_extent,
            center.y - half_extent,
            center.x + half_extent,
            center.y + half_extent,
        )
    }

    /// Smallest rectangle containing both points
    pub fn spanning(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2,
            (self.min_y + self.max_y) / 2,
        )
    }

    /// Grow the rectangle by `amount` on every side
    pub fn inflate(self, amount: i32) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }

    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    pub fn union(self, other: Rect) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Overlap test treating touching edges as overlapping
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// True when the segment `a`-`b` passes through this rectangle
    pub fn intersects_segment(&self, a: Point, b: Point) -> bool {
        if self.contains(a) || self.contains(b) {
            return true;
        }
        if !self.intersects(&Rect::spanning(a, b)) {
            return false;
        }
        if a.x == b.x || a.y == b.y {
            // Axis-aligned and its bounding box overlaps: it crosses.
            return true;
        }
        // Liang-Barsky clip against the rectangle.
        let (x0, y0) = (f64::from(a.x), f64::from(a.y));
        let (dx, dy) = (f64::from(b.x - a.x), f64::from(b.y - a.y));
        let checks = [
            (-dx, x0 - f64::from(self.min_x)),
            (dx, f64::from(self.max_x) - x0),
            (-dy, y0 - f64::from(self.min_y)),
            (dy, f64::from(self.max_y) - y0),
        ];
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in checks {
            if p == 0.0 {
                if q < 0.0 {
                    return false;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {} .. {}, {}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Width and height of a node footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A polygon vertex; arrowheads are rotated so they leave the integer grid
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotate around the origin by `angle` radians
    pub fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    pub fn translated(self, by: Point) -> Self {
        Self {
            x: self.x + f64::from(by.x),
            y: self.y + f64::from(by.y),
        }
    }

    /// Nearest integer point
    pub fn rounded(self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}
