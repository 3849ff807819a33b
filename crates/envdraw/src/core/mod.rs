//! Core building blocks shared by layout, diagram and rendering code
//!
//! Geometry, errors, configuration, logging, the drawing surface and
//! occupancy traits, the retained scene and the character-grid helpers used by
//! the text preview.

mod box_drawing;
mod canvas;
mod chumsky_utils;
pub mod config;
mod edge_routing;
mod error;
mod geometry;
pub mod logging;
mod renderer;
mod scene;
mod surface;
mod text;
mod types;

pub use box_drawing::*;
pub use canvas::*;
pub use chumsky_utils::*;
pub use config::*;
pub use edge_routing::*;
pub use error::*;
pub use geometry::*;
pub use logging::*;
pub use renderer::*;
pub use scene::*;
pub use surface::*;
pub use text::*;
pub use types::*;
