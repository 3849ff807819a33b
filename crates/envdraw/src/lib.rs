//! Envdraw - environment diagrams with automatic layout and routing
//!
//! A library for drawing frames, bindings, values and function objects as a
//! program runs, placing each new node in free space and routing orthogonal
//! arrows between them around whatever is already on the canvas.
//!
//! # Quick Start
//!
//! ```rust
//! use envdraw::render;
//!
//! let script = "set x = 1\ndef square(n)\ncall square(x)\nreturn result = 1";
//! let preview = render(script).unwrap();
//! println!("{}", preview);
//! ```
//!
//! # Advanced Usage
//!
//! For more control, drive the diagram directly:
//!
//! ```rust
//! use envdraw::prelude::*;
//!
//! let mut diagram = Diagram::new(LayoutConfig::seeded(7));
//! let global = diagram.create_frame(None, "Global").unwrap();
//! let value = diagram.create_value(global, "42").unwrap();
//! let connector = diagram.bind(global, "answer", value).unwrap();
//!
//! // Every connector ends on one of its head's inbound anchors
//! let anchor = diagram.connector(connector).unwrap().cached_anchor().unwrap();
//! assert!(diagram.node(value).unwrap().inbound_anchors().contains(&anchor));
//!
//! // Dragging re-routes incident connectors and snaps on release
//! diagram.begin_drag(global, Point::new(60, 60)).unwrap();
//! diagram.drag_to(Point::new(143, 87)).unwrap();
//! let origin = diagram.end_drag().unwrap();
//! assert!(origin.is_grid_aligned());
//! ```

pub mod core;
pub mod diagram;
pub mod layout;
pub mod render;
pub mod trace;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        CharacterSet, DiagramError, LayoutConfig, OccupancyIndex, Point, Rect, Renderer, Scene,
        Surface,
    };
    pub use crate::diagram::{Connector, ConnectorId, ConnectorKind, Diagram, Node, NodeId, NodeKind};
    pub use crate::layout::{Arrowhead, HandleSelector, NodePlacer, PathRouter, Route, RouteQuality};
    pub use crate::render::{AsciiRenderer, JsonRenderer};
    pub use crate::trace::{TraceEvent, TraceParser, TraceStep, TraceValue, Tracker};
}

/// Replay a trace script and render it as a Unicode text preview
///
/// # Example
/// ```rust
/// use envdraw::render;
///
/// let preview = render("set greeting = \"hi\"").unwrap();
/// assert!(preview.contains("Global"));
/// assert!(preview.contains("greeting:"));
/// ```
pub fn render(script: &str) -> anyhow::Result<String> {
    render_with_style(script, CharacterSet::default())
}

/// Replay a trace script and render it with a specific character set
///
/// # Example
/// ```rust
/// use envdraw::{render_with_style, CharacterSet};
///
/// let preview = render_with_style("set x = 1", CharacterSet::Ascii).unwrap();
/// assert!(preview.is_ascii());
/// ```
pub fn render_with_style(script: &str, style: CharacterSet) -> anyhow::Result<String> {
    render_with_config(script, LayoutConfig::default(), style)
}

/// Replay a trace script under `config` and render it with `style`
pub fn render_with_config(
    script: &str,
    config: LayoutConfig,
    style: CharacterSet,
) -> anyhow::Result<String> {
    let diagram = replay(script, config)?;
    render::AsciiRenderer::with_style(style).render(&diagram)
}

/// Parse a trace script into events without replaying it
///
/// # Example
/// ```rust
/// use envdraw::parse;
///
/// let steps = parse("# setup\ndef f(x)\ncall f(1)\nreturn").unwrap();
/// assert_eq!(steps.len(), 3);
/// assert_eq!(steps[0].line, 2);
/// ```
pub fn parse(script: &str) -> anyhow::Result<Vec<trace::TraceStep>> {
    Ok(trace::TraceParser::new().parse(script)?)
}

/// Replay a trace script into a fresh diagram
pub fn replay(script: &str, config: LayoutConfig) -> anyhow::Result<diagram::Diagram> {
    let steps = trace::TraceParser::new().parse(script)?;
    let mut tracker = trace::Tracker::new(config)?;
    tracker.replay(&steps)?;
    Ok(tracker.into_diagram())
}
