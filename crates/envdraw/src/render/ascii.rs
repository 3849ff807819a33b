//! Text preview of a diagram
//!
//! Rasterizes nodes and connector routes onto an [`AsciiCanvas`] at one cell
//! per grid step. Routes are drawn first so node outlines and text stay
//! readable where they overlap.

use anyhow::Result;
use tracing::debug;

use crate::core::{
    floor_to_grid, marker_glyph, AsciiCanvas, BoxChars, CharacterSet, EdgePainter, Point,
    Renderer, GRID_STEP,
};
use crate::diagram::{Diagram, Node, NodeKind, FRAME_WIDTH, FUNCTION_HEIGHT, FUNCTION_WIDTH};

/// Maps canvas coordinates to character cells
#[derive(Debug, Clone, Copy)]
struct CellGrid {
    origin: Point,
}

impl CellGrid {
    fn column(&self, x: i32) -> usize {
        usize::try_from((x - self.origin.x).div_euclid(GRID_STEP)).unwrap_or(0)
    }

    fn row(&self, y: i32) -> usize {
        usize::try_from((y - self.origin.y).div_euclid(GRID_STEP)).unwrap_or(0)
    }

    /// Nearest cell, used for route corners
    fn cell(&self, p: Point) -> (usize, usize) {
        let snapped = p.snapped();
        (self.column(snapped.x), self.row(snapped.y))
    }
}

/// Renders a diagram as box-drawing text
pub struct AsciiRenderer {
    style: CharacterSet,
}

impl AsciiRenderer {
    /// Create a new renderer with default Unicode style
    pub fn new() -> Self {
        Self {
            style: CharacterSet::default(),
        }
    }

    /// Create a new renderer with a specific character set
    pub fn with_style(style: CharacterSet) -> Self {
        Self { style }
    }

    pub fn style(&self) -> CharacterSet {
        self.style
    }

    fn draw_node(&self, canvas: &mut AsciiCanvas, grid: CellGrid, node: &Node) {
        let Point { x, y } = node.position;
        match &node.kind {
            NodeKind::Frame { label, .. } => {
                let bounds = node.bounds();
                let (left, top) = (grid.column(x), grid.row(y));
                BoxChars::frame(self.style).draw(
                    canvas,
                    left,
                    top,
                    grid.column(bounds.max_x),
                    grid.row(bounds.max_y),
                );
                canvas.draw_text(left + 1, top + 1, label);
                canvas.set_char(grid.column(x + FRAME_WIDTH), top, marker_glyph(self.style));
            }
            NodeKind::Function { name, args, .. } => {
                let (left, top) = (grid.column(x), grid.row(y));
                BoxChars::function(self.style).draw(
                    canvas,
                    left,
                    top,
                    grid.column(x + FUNCTION_WIDTH),
                    grid.row(y + FUNCTION_HEIGHT),
                );
                canvas.draw_text(left + 1, top + 1, &format!("{}({}):", name, args.join(", ")));
                canvas.draw_text(left + 2, top + 3, "...");
                canvas.set_char(grid.column(x + FUNCTION_WIDTH - 10), top, marker_glyph(self.style));
            }
            NodeKind::Variable { .. } => {
                canvas.draw_text(grid.column(x), grid.row(y), &node.text().unwrap_or_default());
            }
            NodeKind::Value { text } => {
                canvas.draw_text_right(grid.column(x) + 1, grid.row(y), text);
            }
        }
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for AsciiRenderer {
    type Output = String;

    fn render(&self, diagram: &Diagram) -> Result<Self::Output> {
        let Some(bounds) = diagram.scene().bounds() else {
            return Ok(String::new());
        };
        let grid = CellGrid {
            origin: Point::new(floor_to_grid(bounds.min_x), floor_to_grid(bounds.min_y)),
        };
        let mut canvas = AsciiCanvas::new(grid.column(bounds.max_x) + 1, grid.row(bounds.max_y) + 1);

        let painter = EdgePainter::new(self.style);
        for connector in diagram.connectors() {
            if let Some(route) = connector.route() {
                let cells: Vec<(usize, usize)> =
                    route.simplified().into_iter().map(|p| grid.cell(p)).collect();
                painter.draw_route(&mut canvas, &cells);
            }
        }

        for node in diagram.nodes() {
            self.draw_node(&mut canvas, grid, node);
        }

        debug!(
            width = canvas.width,
            height = canvas.height,
            style = %self.style,
            "ascii preview rendered"
        );
        Ok(canvas.to_string())
    }

    fn name(&self) -> &'static str {
        "ascii"
    }

    fn format(&self) -> &'static str {
        "text"
    }
}
