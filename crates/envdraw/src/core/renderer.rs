//! Core renderer trait for diagram output
//!
//! A renderer turns the current state of a [`Diagram`] into some output
//! format (a text preview, a JSON snapshot).

use anyhow::Result;

use crate::diagram::Diagram;

/// Core trait for diagram renderers
///
/// # Example
/// ```
/// use envdraw::core::{LayoutConfig, Renderer};
/// use envdraw::diagram::Diagram;
/// use envdraw::render::JsonRenderer;
///
/// let diagram = Diagram::new(LayoutConfig::seeded(1));
/// let output = JsonRenderer::new().render(&diagram).unwrap();
/// assert!(output.contains("\"nodes\""));
/// ```
pub trait Renderer: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the diagram into the output format
    fn render(&self, diagram: &Diagram) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
