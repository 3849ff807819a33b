//! Core error types for diagram processing
//!
//! This module defines the error types used by the diagram session, the router
//! and the trace replay pipeline.

use thiserror::Error;

use super::Point;
use crate::diagram::{ConnectorId, NodeId};

/// Errors raised by diagram operations and trace replay
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Unknown node: {id}")]
    UnknownNode { id: NodeId },

    #[error("Unknown connector: {id}")]
    UnknownConnector { id: ConnectorId },

    #[error("Node {id} is not a frame")]
    NotAFrame { id: NodeId },

    #[error("Node {id} has no inbound anchors")]
    NoInboundAnchors { id: NodeId },

    #[error("Node {id} cannot be bound to a name")]
    NotBindable { id: NodeId },

    #[error("No drag gesture in progress")]
    NoActiveDrag,

    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("Cannot return from the global frame")]
    CallStackUnderflow,

    #[error("Script error: {message} at line {line}, column {column}")]
    ScriptError {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new script syntax error
    pub fn script_error(message: String, line: usize, column: usize) -> Self {
        Self::ScriptError {
            message,
            line,
            column,
        }
    }

    /// Create a new unknown-function error
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction { name: name.into() }
    }
}

/// Router failure, recovered by the caller with a direct stub line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No route from {start} to {goal} after {expansions} expansions")]
    Unreachable {
        start: Point,
        goal: Point,
        expansions: usize,
    },
}
