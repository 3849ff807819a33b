//! Output renderers
//!
//! [`AsciiRenderer`] draws a text preview and [`JsonRenderer`] emits a
//! serialized snapshot. Both implement [`crate::core::Renderer`].

mod ascii;
mod json;

pub use ascii::*;
pub use json::*;
