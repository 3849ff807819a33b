//! Arrowhead orientation
//!
//! The arrowhead is a fixed four-point silhouette pointing along +x with its
//! tip at the origin. It is rotated to the direction of the route's final
//! segment and moved onto the route's endpoint.

use serde::Serialize;

use crate::core::{Heading, Point, Shape, Vertex};

/// Tip, upper back corner, back notch, lower back corner
pub const ARROWHEAD_SILHOUETTE: [Vertex; 4] = [
    Vertex::new(0.0, 0.0),
    Vertex::new(-10.0, -5.0),
    Vertex::new(-7.0, 0.0),
    Vertex::new(-10.0, 5.0),
];

/// An oriented arrowhead polygon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrowhead {
    pub tip: Point,
    /// Rotation in radians, `atan2(dy, dx)` of the final segment
    pub angle: f64,
    pub vertices: Vec<Vertex>,
}

impl Arrowhead {
    /// Orient the silhouette at the end of `route`
    ///
    /// The direction comes from the last point before the endpoint that
    /// differs from it. Without one the arrow points along +x.
    pub fn orient(route: &[Point]) -> Option<Self> {
        let (&tip, rest) = route.split_last()?;
        let angle = rest
            .iter()
            .rev()
            .find(|&&p| p != tip)
            .map(|prev| f64::from(tip.y - prev.y).atan2(f64::from(tip.x - prev.x)))
            .unwrap_or(0.0);
        let vertices = ARROWHEAD_SILHOUETTE
            .iter()
            .map(|v| v.rotated(angle).translated(tip))
            .collect();
        Some(Self {
            tip,
            angle,
            vertices,
        })
    }

    /// Closest compass heading, for text output
    pub fn heading(&self) -> Heading {
        let quarter = (self.angle / std::f64::consts::FRAC_PI_2).round() as i64;
        match quarter.rem_euclid(4) {
            0 => Heading::Right,
            1 => Heading::Down,
            2 => Heading::Left,
            _ => Heading::Up,
        }
    }

    pub fn to_shape(&self) -> Shape {
        Shape::Polygon {
            vertices: self.vertices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(v: Vertex, x: f64, y: f64) {
        assert!((v.x - x).abs() < 1e-9 && (v.y - y).abs() < 1e-9, "{:?} != ({}, {})", v, x, y);
    }

    #[test]
    fn test_rightward_arrow_is_untransformed_silhouette() {
        let arrow = Arrowhead::orient(&[Point::new(0, 0), Point::new(100, 0)]).unwrap();
        assert_eq!(arrow.angle, 0.0);
        assert_close(arrow.vertices[0], 100.0, 0.0);
        assert_close(arrow.vertices[1], 90.0, -5.0);
        assert_close(arrow.vertices[2], 93.0, 0.0);
        assert_close(arrow.vertices[3], 90.0, 5.0);
        assert_eq!(arrow.heading(), Heading::Right);
    }

    #[test]
    fn test_downward_arrow() {
        let arrow = Arrowhead::orient(&[Point::new(50, 0), Point::new(50, 40)]).unwrap();
        assert!((arrow.angle - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert_close(arrow.vertices[0], 50.0, 40.0);
        assert_close(arrow.vertices[2], 50.0, 33.0);
        assert_eq!(arrow.heading(), Heading::Down);
    }

    #[test]
    fn test_repeated_endpoint_uses_last_distinct_point() {
        let route = [Point::new(0, 100), Point::new(0, 50), Point::new(0, 50)];
        let arrow = Arrowhead::orient(&route).unwrap();
        assert_eq!(arrow.heading(), Heading::Up);
        assert_eq!(arrow.tip, Point::new(0, 50));
    }

    #[test]
    fn test_degenerate_route_points_right() {
        let p = Point::new(30, 30);
        let arrow = Arrowhead::orient(&[p, p]).unwrap();
        assert_eq!(arrow.angle, 0.0);
        assert_eq!(arrow.heading(), Heading::Right);
    }

    #[test]
    fn test_empty_route() {
        assert!(Arrowhead::orient(&[]).is_none());
    }

    #[test]
    fn test_leftward_heading() {
        let arrow = Arrowhead::orient(&[Point::new(100, 0), Point::new(0, 0)]).unwrap();
        assert_eq!(arrow.heading(), Heading::Left);
    }
}
