//! Connectors between nodes
//!
//! A connector refers to its endpoints by id only. It caches the anchor it
//! chose on the head, the route it last drew and the oriented arrowhead, so a
//! redraw can be skipped or translated without another search.

use std::fmt;

use serde::Serialize;

use super::{Node, NodeId};
use crate::core::Point;
use crate::layout::{Arrowhead, Route, RouteQuality};

/// Arena index of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConnectorId(usize);

impl ConnectorId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connector{}", self.0)
    }
}

/// What a connector means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorKind {
    /// Variable (tail) to the value it names (head)
    Binding,
    /// Frame or function (tail) to its enclosing frame (head)
    StaticLink,
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorKind::Binding => write!(f, "binding"),
            ConnectorKind::StaticLink => write!(f, "static-link"),
        }
    }
}

/// An arrow from a tail node's outbound anchor to one of the head's inbound anchors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub id: ConnectorId,
    pub kind: ConnectorKind,
    pub head: NodeId,
    pub tail: NodeId,
    pub(crate) anchor: Option<Point>,
    pub(crate) route: Option<Route>,
    pub(crate) arrowhead: Option<Arrowhead>,
    /// Set while a drag has moved one endpoint without re-routing
    pub(crate) dirty: bool,
}

impl Connector {
    pub fn new(id: ConnectorId, kind: ConnectorKind, head: NodeId, tail: NodeId) -> Self {
        Self {
            id,
            kind,
            head,
            tail,
            anchor: None,
            route: None,
            arrowhead: None,
            dirty: true,
        }
    }

    /// The cached anchor, provided it is still one of `head`'s inbound anchors
    pub fn anchor_for(&self, head: &Node) -> Option<Point> {
        let anchor = self.anchor?;
        head.inbound_anchors().contains(&anchor).then_some(anchor)
    }

    /// The cached anchor without validation
    pub fn cached_anchor(&self) -> Option<Point> {
        self.anchor
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn arrowhead(&self) -> Option<&Arrowhead> {
        self.arrowhead.as_ref()
    }

    pub fn quality(&self) -> Option<RouteQuality> {
        self.route.as_ref().map(|r| r.quality)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.head == node || self.tail == node
    }

    /// The endpoint that is not `node`
    pub fn other_end(&self, node: NodeId) -> NodeId {
        if self.head == node {
            self.tail
        } else {
            self.head
        }
    }

    /// Shift the cached geometry when both endpoints moved together
    pub(crate) fn translate(&mut self, dx: i32, dy: i32) {
        self.anchor = self.anchor.map(|p| p.offset(dx, dy));
        if let Some(route) = self.route.as_mut() {
            route.translate(dx, dy);
        }
        self.arrowhead = self
            .route
            .as_ref()
            .and_then(|route| Arrowhead::orient(&route.points));
    }
}
