//! Drawing surface and occupancy capabilities
//!
//! The layout engine never talks to a concrete canvas. It draws tagged
//! primitive shapes through [`Surface`] and asks [`OccupancyIndex`] how crowded
//! a region is. [`crate::core::Scene`] implements both.

use serde::Serialize;

use super::{Point, Rect, Size, Vertex};
use crate::diagram::{ConnectorId, NodeId};

/// Owner of a group of drawn shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "owner", content = "id", rename_all = "lowercase")]
pub enum ShapeTag {
    Node(NodeId),
    Connector(ConnectorId),
}

impl std::fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeTag::Node(id) => write!(f, "{}", id),
            ShapeTag::Connector(id) => write!(f, "{}", id),
        }
    }
}

/// Which corner of a text item its position refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnchor {
    NorthWest,
    NorthEast,
}

/// A primitive drawn on the surface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Rect { bounds: Rect },
    Oval { bounds: Rect },
    Text {
        position: Point,
        anchor: TextAnchor,
        size: Size,
        text: String,
    },
    Polyline { points: Vec<Point> },
    Polygon { vertices: Vec<Vertex> },
}

impl Shape {
    /// Axis-aligned bounding box
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect { bounds } | Shape::Oval { bounds } => *bounds,
            Shape::Text {
                position,
                anchor,
                size,
                ..
            } => match anchor {
                TextAnchor::NorthWest => Rect::from_origin(*position, size.width, size.height),
                TextAnchor::NorthEast => Rect::new(
                    position.x - size.width,
                    position.y,
                    position.x,
                    position.y + size.height,
                ),
            },
            Shape::Polyline { points } => points
                .iter()
                .map(|p| Rect::spanning(*p, *p))
                .reduce(Rect::union)
                .unwrap_or(Rect::new(0, 0, 0, 0)),
            Shape::Polygon { vertices } => vertices
                .iter()
                .map(|v| {
                    let p = v.rounded();
                    Rect::spanning(p, p)
                })
                .reduce(Rect::union)
                .unwrap_or(Rect::new(0, 0, 0, 0)),
        }
    }

    /// True when the shape touches `area`; polylines are tested per segment
    pub fn overlaps(&self, area: &Rect) -> bool {
        match self {
            Shape::Polyline { points } => match points.as_slice() {
                [] => false,
                [only] => area.contains(*only),
                _ => points
                    .windows(2)
                    .any(|pair| area.intersects_segment(pair[0], pair[1])),
            },
            _ => self.bounds().intersects(area),
        }
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        match self {
            Shape::Rect { bounds } | Shape::Oval { bounds } => *bounds = bounds.translate(dx, dy),
            Shape::Text { position, .. } => *position = position.offset(dx, dy),
            Shape::Polyline { points } => {
                for p in points.iter_mut() {
                    *p = p.offset(dx, dy);
                }
            }
            Shape::Polygon { vertices } => {
                let by = Point::new(dx, dy);
                for v in vertices.iter_mut() {
                    *v = v.translated(by);
                }
            }
        }
    }
}

/// Retained drawing target for tagged shapes
pub trait Surface {
    /// Add a shape to the group owned by `tag`
    fn draw(&mut self, tag: ShapeTag, shape: Shape);

    /// Remove every shape owned by `tag`
    fn clear(&mut self, tag: ShapeTag);

    /// Move every shape owned by `tag`
    fn translate(&mut self, tag: ShapeTag, dx: i32, dy: i32);
}

/// Crowding query used by placement and routing
pub trait OccupancyIndex {
    /// Number of drawn shapes overlapping `area`, touching included
    fn count_overlapping(&self, area: &Rect) -> usize;

    /// Total number of shapes visible to this index
    fn shape_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.shape_count() == 0
    }
}

/// An index that never reports anything; routes on a blank canvas
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyOccupancy;

impl OccupancyIndex for EmptyOccupancy {
    fn count_overlapping(&self, _area: &Rect) -> usize {
        0
    }

    fn shape_count(&self) -> usize {
        0
    }
}
