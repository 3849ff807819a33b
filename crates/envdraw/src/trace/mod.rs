//! Trace replay
//!
//! A line-oriented script is parsed into [`TraceEvent`]s, which the
//! [`Tracker`] turns into diagram operations.

mod event;
mod parser;
mod tracker;

pub use event::*;
pub use parser::*;
pub use tracker::*;
