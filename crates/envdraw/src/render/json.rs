//! JSON snapshot of a diagram
//!
//! Serializes the live nodes and connectors, including routes, arrowheads and
//! route quality, so other tools can draw or inspect the layout.

use anyhow::Result;
use serde::Serialize;

use crate::core::{LayoutConfig, Rect, Renderer};
use crate::diagram::{Connector, Diagram, Node};

#[derive(Serialize)]
struct Snapshot<'a> {
    config: &'a LayoutConfig,
    bounds: Option<Rect>,
    nodes: Vec<&'a Node>,
    connectors: Vec<&'a Connector>,
}

/// Renders a diagram as a JSON document
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    /// Pretty-printed output
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Single-line output
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, diagram: &Diagram) -> Result<Self::Output> {
        let snapshot = Snapshot {
            config: diagram.config(),
            bounds: diagram.scene().bounds(),
            nodes: diagram.nodes().collect(),
            connectors: diagram.connectors().collect(),
        };
        let output = if self.pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn format(&self) -> &'static str {
        "json"
    }
}
