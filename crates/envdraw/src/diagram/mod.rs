//! Environment diagram model
//!
//! Nodes (frames, variables, values, functions), the connectors between them
//! and the [`Diagram`] session that keeps both arenas, the scene and the
//! layout engine consistent.

mod connector;
mod node;
mod session;

pub use connector::*;
pub use node::*;
pub use session::*;
