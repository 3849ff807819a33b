//! Diagram nodes and their geometry
//!
//! Each node kind knows its footprint, its inbound anchors, its single
//! outbound anchor and the primitive shapes it draws. All anchors are snapped
//! to the grid so that routes start and end on lattice points.

use std::fmt;

use serde::Serialize;

use crate::core::{grid_text_extent, measure_text, Point, Rect, Shape, Size, TextAnchor, Vertex};

/// Frame width in canvas units
pub const FRAME_WIDTH: i32 = 150;
/// Frame height with no bindings
pub const FRAME_BASE_HEIGHT: i32 = 40;
/// Vertical distance between binding rows
pub const BINDING_ROW_HEIGHT: i32 = 20;
pub const FUNCTION_WIDTH: i32 = 150;
pub const FUNCTION_HEIGHT: i32 = 60;

/// Arena index of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// One name-to-value row of a frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingSlot {
    pub name: String,
    pub variable: NodeId,
    pub value: NodeId,
    pub connector: crate::diagram::ConnectorId,
}

/// What a node is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    /// A scope; `parent` is the lexically enclosing frame
    Frame {
        label: String,
        parent: Option<NodeId>,
        bindings: Vec<BindingSlot>,
    },
    Variable { name: String },
    Value { text: String },
    /// A function object defined in `frame`
    Function {
        name: String,
        args: Vec<String>,
        frame: NodeId,
    },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Frame { .. } => "frame",
            NodeKind::Variable { .. } => "variable",
            NodeKind::Value { .. } => "value",
            NodeKind::Function { .. } => "function",
        }
    }
}

/// A node in the diagram arena
///
/// `position` is the top-left corner for frames and functions, the north-west
/// corner of the text for variables and its north-east corner for values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub position: Point,
    /// Node that translates this one when it moves
    pub owner: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub connectors: Vec<crate::diagram::ConnectorId>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, position: Point) -> Self {
        Self {
            id,
            kind,
            position,
            owner: None,
            children: Vec::new(),
            connectors: Vec::new(),
        }
    }

    pub fn is_frame(&self) -> bool {
        matches!(self.kind, NodeKind::Frame { .. })
    }

    /// Only values and functions can sit on the right of a binding
    pub fn is_bindable(&self) -> bool {
        matches!(self.kind, NodeKind::Value { .. } | NodeKind::Function { .. })
    }

    /// Values move with their binding row; functions stay where they are
    pub fn moves_with_binding(&self) -> bool {
        matches!(self.kind, NodeKind::Value { .. })
    }

    pub fn bindings(&self) -> &[BindingSlot] {
        match &self.kind {
            NodeKind::Frame { bindings, .. } => bindings,
            _ => &[],
        }
    }

    /// Text shown by a variable or value
    pub fn text(&self) -> Option<String> {
        match &self.kind {
            NodeKind::Variable { name } => Some(format!("{}:", name)),
            NodeKind::Value { text } => Some(text.clone()),
            _ => None,
        }
    }

    /// Width and height of the node's main shape
    pub fn size(&self) -> Size {
        match &self.kind {
            NodeKind::Frame { bindings, .. } => Size::new(
                FRAME_WIDTH,
                FRAME_BASE_HEIGHT + BINDING_ROW_HEIGHT * row_count(bindings.len()),
            ),
            NodeKind::Function { .. } => Size::new(FUNCTION_WIDTH, FUNCTION_HEIGHT),
            NodeKind::Variable { .. } | NodeKind::Value { .. } => {
                measure_text(&self.text().unwrap_or_default())
            }
        }
    }

    /// Bounding box of the main shape
    pub fn bounds(&self) -> Rect {
        let size = self.size();
        match self.kind {
            NodeKind::Value { .. } => Rect::new(
                self.position.x - size.width,
                self.position.y,
                self.position.x,
                self.position.y + size.height,
            ),
            _ => Rect::from_origin(self.position, size.width, size.height),
        }
    }

    /// Candidate points where incoming connectors may attach
    pub fn inbound_anchors(&self) -> Vec<Point> {
        let Point { x, y } = self.position;
        let anchors = match &self.kind {
            NodeKind::Frame { bindings, .. } => {
                let size = self.size();
                let rows = 0..=row_count(bindings.len());
                let left = rows.clone().map(|i| Point::new(x, y + BINDING_ROW_HEIGHT * (i + 1)));
                let right = rows.map(|i| Point::new(x + size.width, y + BINDING_ROW_HEIGHT * (i + 1)));
                let top = [Point::new(x + 40, y), Point::new(x + 110, y)];
                let bottom = top.map(|p| Point::new(p.x, y + size.height));
                left.chain(right).chain(top).chain(bottom).collect()
            }
            NodeKind::Variable { .. } => Vec::new(),
            NodeKind::Value { .. } => {
                let size = self.size();
                vec![Point::new(x - size.width, y + size.height / 2)]
            }
            NodeKind::Function { .. } => vec![Point::new(x, y + 10), Point::new(x + FUNCTION_WIDTH, y + 50)],
        };
        anchors.into_iter().map(Point::snapped).collect()
    }

    /// The single point outgoing connectors leave from
    pub fn outbound_anchor(&self) -> Point {
        let Point { x, y } = self.position;
        let anchor = match &self.kind {
            NodeKind::Frame { .. } => Point::new(x + FRAME_WIDTH, y),
            NodeKind::Variable { .. } => {
                let extent = grid_text_extent(&self.text().unwrap_or_default());
                Point::new(x + extent.width, y + extent.height / 2)
            }
            NodeKind::Value { .. } => Point::new(x, y + self.size().height / 2),
            NodeKind::Function { .. } => Point::new(x + FUNCTION_WIDTH - 10, y),
        };
        anchor.snapped()
    }

    /// Primitive shapes drawn for this node
    pub fn shapes(&self) -> Vec<Shape> {
        let Point { x, y } = self.position;
        match &self.kind {
            NodeKind::Frame { label, .. } => vec![
                Shape::Rect {
                    bounds: self.bounds(),
                },
                Shape::Oval {
                    bounds: Rect::new(x + 135, y - 15, x + 165, y + 15),
                },
                text_shape(Point::new(x + 10, y + 3), TextAnchor::NorthWest, label),
            ],
            NodeKind::Variable { .. } => vec![text_shape(
                self.position,
                TextAnchor::NorthWest,
                &self.text().unwrap_or_default(),
            )],
            NodeKind::Value { text } => vec![text_shape(self.position, TextAnchor::NorthEast, text)],
            NodeKind::Function { name, args, .. } => {
                let outline = [
                    (0, 0),
                    (140, 0),
                    (140, 30),
                    (150, 30),
                    (150, 60),
                    (10, 60),
                    (10, 30),
                    (0, 30),
                ];
                vec![
                    Shape::Polygon {
                        vertices: outline
                            .iter()
                            .map(|&(dx, dy)| Vertex::new(f64::from(x + dx), f64::from(y + dy)))
                            .collect(),
                    },
                    Shape::Oval {
                        bounds: Rect::new(x + 125, y - 15, x + 155, y + 15),
                    },
                    text_shape(
                        Point::new(x, y + 5),
                        TextAnchor::NorthWest,
                        &format!("{}({}):", name, args.join(", ")),
                    ),
                    text_shape(Point::new(x + 15, y + 35), TextAnchor::NorthWest, "..."),
                ]
            }
        }
    }

    /// Position of the n-th binding row (1-based) for a frame at `frame_origin`
    pub fn binding_row_positions(frame_origin: Point, row: usize) -> (Point, Point) {
        let dy = BINDING_ROW_HEIGHT * row_count(row);
        (
            frame_origin.offset(10, dy),
            frame_origin.offset(FRAME_WIDTH - 10, dy),
        )
    }
}

fn text_shape(position: Point, anchor: TextAnchor, text: &str) -> Shape {
    Shape::Text {
        position,
        anchor,
        size: measure_text(text),
        text: text.to_string(),
    }
}

fn row_count(rows: usize) -> i32 {
    i32::try_from(rows).unwrap_or(i32::MAX / BINDING_ROW_HEIGHT)
}
