//! Auto-layout and routing engine
//!
//! - [`NodePlacer`] drops new nodes at random overlap-free grid points
//! - [`HandleSelector`] picks the inbound anchor a connector attaches to
//! - [`PathRouter`] finds an orthogonal route between two anchors
//! - [`Arrowhead`] orients the arrow polygon at the end of a route
//!
//! None of these own diagram state; they read an
//! [`OccupancyIndex`](crate::core::OccupancyIndex) and return values.

mod anchor;
mod arrowhead;
mod placer;
mod router;

pub use anchor::*;
pub use arrowhead::*;
pub use placer::*;
pub use router::*;
