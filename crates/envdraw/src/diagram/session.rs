//! The diagram session
//!
//! [`Diagram`] owns the node and connector arenas, the retained [`Scene`] and
//! the layout engine. Every structural change goes through it so that the
//! scene, the ownership tree and the connector caches stay in step: moving a
//! node moves its subtree and re-routes every connector touching it.

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use super::{BindingSlot, Connector, ConnectorId, ConnectorKind, Node, NodeId, NodeKind};
use crate::core::{DiagramError, LayoutConfig, Point, Scene, Shape, ShapeTag, Surface};
use crate::layout::{Arrowhead, HandleSelector, NodePlacer, PathRouter, Route, RouteQuality};

type Result<T> = std::result::Result<T, DiagramError>;

#[derive(Debug, Clone, Copy)]
struct DragState {
    root: NodeId,
    last_pointer: Point,
}

/// A live environment diagram
#[derive(Debug, Clone)]
pub struct Diagram {
    config: LayoutConfig,
    nodes: Vec<Option<Node>>,
    connectors: Vec<Option<Connector>>,
    scene: Scene,
    placer: NodePlacer,
    selector: HandleSelector,
    router: PathRouter,
    drag: Option<DragState>,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl Diagram {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            placer: NodePlacer::new(&config),
            selector: HandleSelector::new(config.anchor_usage_penalty),
            router: PathRouter::new(config.router.clone(), config.canvas_bounds()),
            config,
            nodes: Vec::new(),
            connectors: Vec::new(),
            scene: Scene::new(),
            drag: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Everything drawn so far
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn router(&self) -> &PathRouter {
        &self.router
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(DiagramError::UnknownNode { id })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(DiagramError::UnknownNode { id })
    }

    /// Live nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().flatten()
    }

    pub fn connector(&self, id: ConnectorId) -> Result<&Connector> {
        self.connectors
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(DiagramError::UnknownConnector { id })
    }

    fn connector_mut(&mut self, id: ConnectorId) -> Result<&mut Connector> {
        self.connectors
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(DiagramError::UnknownConnector { id })
    }

    /// Live connectors in creation order
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> + '_ {
        self.connectors.iter().flatten()
    }

    /// Value currently bound to `name` in `frame`
    pub fn lookup(&self, frame: NodeId, name: &str) -> Result<Option<NodeId>> {
        let frame = self.frame(frame)?;
        Ok(frame
            .bindings()
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| slot.value))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn frame(&self, id: NodeId) -> Result<&Node> {
        let node = self.node(id)?;
        if node.is_frame() {
            Ok(node)
        } else {
            Err(DiagramError::NotAFrame { id })
        }
    }

    fn frame_bindings_mut(&mut self, id: NodeId) -> Result<&mut Vec<BindingSlot>> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Frame { bindings, .. } => Ok(bindings),
            _ => Err(DiagramError::NotAFrame { id }),
        }
    }

    // ---- creation -------------------------------------------------------

    fn insert_node(&mut self, kind: NodeKind, position: Point, owner: Option<NodeId>) -> Result<NodeId> {
        let id = NodeId::new(self.nodes.len());
        let mut node = Node::new(id, kind, position);
        node.owner = owner;
        if let Some(owner) = owner {
            self.node_mut(owner)?.children.push(id);
        }
        trace!(node = %id, kind = node.kind.name(), %position, "node created");
        self.nodes.push(Some(node));
        self.redraw_node(id)?;
        Ok(id)
    }

    fn redraw_node(&mut self, id: NodeId) -> Result<()> {
        let shapes = self.node(id)?.shapes();
        let tag = ShapeTag::Node(id);
        self.scene.clear(tag);
        for shape in shapes {
            self.scene.draw(tag, shape);
        }
        Ok(())
    }

    /// Create a frame at a free spot, linked to its enclosing frame if any
    pub fn create_frame(&mut self, parent: Option<NodeId>, label: impl Into<String>) -> Result<NodeId> {
        if let Some(parent) = parent {
            self.frame(parent)?;
        }
        let placement = self.placer.place(&self.scene);
        let id = self.insert_node(
            NodeKind::Frame {
                label: label.into(),
                parent,
                bindings: Vec::new(),
            },
            placement.point,
            None,
        )?;
        debug!(
            frame = %id,
            position = %placement.point,
            attempts = placement.attempts,
            overlap_free = placement.overlap_free,
            "frame placed"
        );
        if let Some(parent) = parent {
            self.connect(ConnectorKind::StaticLink, parent, id)?;
        }
        Ok(id)
    }

    /// Create an unbound variable owned by `frame`
    pub fn create_variable(&mut self, frame: NodeId, name: impl Into<String>) -> Result<NodeId> {
        let origin = self.frame(frame)?.position;
        self.insert_node(NodeKind::Variable { name: name.into() }, origin, Some(frame))
    }

    /// Create an unbound value owned by `frame`
    pub fn create_value(&mut self, frame: NodeId, text: impl Into<String>) -> Result<NodeId> {
        let (_, position) = Node::binding_row_positions(self.frame(frame)?.position, 0);
        self.insert_node(NodeKind::Value { text: text.into() }, position, Some(frame))
    }

    /// Create a function object defined in `frame`, placed on its own
    pub fn create_function(
        &mut self,
        frame: NodeId,
        name: impl Into<String>,
        args: Vec<String>,
    ) -> Result<NodeId> {
        self.frame(frame)?;
        let placement = self.placer.place(&self.scene);
        let id = self.insert_node(
            NodeKind::Function {
                name: name.into(),
                args,
                frame,
            },
            placement.point,
            None,
        )?;
        debug!(function = %id, position = %placement.point, "function placed");
        self.connect(ConnectorKind::StaticLink, frame, id)?;
        Ok(id)
    }

    /// Bind `name` in `frame` to `value`
    ///
    /// A new name gets the next binding row and grows the frame. Rebinding an
    /// existing name keeps the row and its variable, and discards the old
    /// value if the frame owned it. Only values and functions can be bound;
    /// anything else is rejected before the frame is touched.
    pub fn bind(&mut self, frame: NodeId, name: &str, value: NodeId) -> Result<ConnectorId> {
        let frame_origin = self.frame(frame)?.position;
        let target = self.node(value)?;
        if !target.is_bindable() {
            return Err(DiagramError::NotBindable { id: value });
        }
        if target.inbound_anchors().is_empty() {
            return Err(DiagramError::NoInboundAnchors { id: value });
        }
        let value_moves = target.moves_with_binding();
        let existing = self
            .frame(frame)?
            .bindings()
            .iter()
            .position(|slot| slot.name == name);

        let (row, variable) = match existing {
            Some(index) => {
                let slot = self.frame(frame)?.bindings()[index].clone();
                if slot.value == value {
                    return Ok(slot.connector);
                }
                debug!(frame = %frame, name, old = %slot.value, new = %value, "rebinding");
                self.discard_connector(slot.connector)?;
                if self.node(slot.value)?.owner == Some(frame) {
                    self.discard_node(slot.value)?;
                }
                (index + 1, slot.variable)
            }
            None => {
                let variable = self.create_variable(frame, name)?;
                let row = self.frame(frame)?.bindings().len() + 1;
                (row, variable)
            }
        };

        let (variable_at, value_at) = Node::binding_row_positions(frame_origin, row);
        self.place_at(variable, variable_at)?;
        if value_moves {
            self.adopt(frame, value)?;
            self.place_at(value, value_at)?;
        }

        let connector = self.connect(ConnectorKind::Binding, value, variable)?;
        let slot = BindingSlot {
            name: name.to_string(),
            variable,
            value,
            connector,
        };
        let bindings = self.frame_bindings_mut(frame)?;
        match existing {
            Some(index) => bindings[index] = slot,
            None => bindings.push(slot),
        }

        if existing.is_none() {
            // The frame grew, so its anchors moved.
            self.redraw_node(frame)?;
            let touching = self.incident_connectors(&[frame]);
            for id in touching {
                self.update_connector(id)?;
            }
        }
        Ok(connector)
    }

    /// Connect `tail` to `head` and route the new connector
    pub fn connect(&mut self, kind: ConnectorKind, head: NodeId, tail: NodeId) -> Result<ConnectorId> {
        if self.node(head)?.inbound_anchors().is_empty() {
            return Err(DiagramError::NoInboundAnchors { id: head });
        }
        self.node(tail)?;

        let id = ConnectorId::new(self.connectors.len());
        self.connectors.push(Some(Connector::new(id, kind, head, tail)));
        self.node_mut(head)?.connectors.push(id);
        if tail != head {
            self.node_mut(tail)?.connectors.push(id);
        }
        let quality = self.update_connector(id)?;
        trace!(connector = %id, %kind, %head, %tail, ?quality, "connector created");
        Ok(id)
    }

    // ---- connector management -------------------------------------------

    /// Reselect the anchor, re-route and redraw one connector
    ///
    /// Routing failures never propagate: the connector falls back to a
    /// direct stub and the failure is logged.
    pub fn update_connector(&mut self, id: ConnectorId) -> Result<RouteQuality> {
        let (head_id, tail_id) = {
            let connector = self.connector(id)?;
            (connector.head, connector.tail)
        };
        let head = self.node(head_id)?;
        let from = self.node(tail_id)?.outbound_anchor();
        let taken: Vec<Point> = head
            .connectors
            .iter()
            .filter(|&&other| other != id)
            .filter_map(|&other| self.connector(other).ok())
            .filter(|other| other.head == head_id)
            .filter_map(|other| other.anchor_for(head))
            .collect();
        let anchor = self
            .selector
            .select_anchor(from, &head.inbound_anchors(), &taken)
            .ok_or(DiagramError::NoInboundAnchors { id: head_id })?;

        let tag = ShapeTag::Connector(id);
        let route = match self.router.route(from, anchor, &self.scene.without(tag)) {
            Ok(route) => route,
            Err(err) => {
                warn!(connector = %id, error = %err, "routing failed, drawing a direct stub");
                Route::stub(from, anchor)
            }
        };
        if route.quality == RouteQuality::Truncated {
            debug!(connector = %id, expansions = route.expansions, "route truncated");
        }
        let arrowhead = Arrowhead::orient(&route.points);

        self.scene.clear(tag);
        self.scene.draw(
            tag,
            Shape::Polyline {
                points: route.points.clone(),
            },
        );
        if let Some(arrow) = &arrowhead {
            self.scene.draw(tag, arrow.to_shape());
        }

        let quality = route.quality;
        let connector = self.connector_mut(id)?;
        connector.anchor = Some(anchor);
        connector.route = Some(route);
        connector.arrowhead = arrowhead;
        connector.dirty = false;
        Ok(quality)
    }

    /// Re-route every connector
    pub fn update_all(&mut self) -> Result<()> {
        let ids: Vec<ConnectorId> = self.connectors().map(|c| c.id).collect();
        for id in ids {
            self.update_connector(id)?;
        }
        Ok(())
    }

    fn incident_connectors(&self, nodes: &[NodeId]) -> Vec<ConnectorId> {
        let ids: BTreeSet<ConnectorId> = nodes
            .iter()
            .filter_map(|id| self.node(*id).ok())
            .flat_map(|node| node.connectors.iter().copied())
            .collect();
        ids.into_iter().collect()
    }

    // ---- movement -------------------------------------------------------

    /// `id` and every node it transitively owns
    pub fn subtree(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = self.node(next)?;
            out.push(next);
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(out)
    }

    /// The top-level node that owns `id`
    pub fn root_of(&self, id: NodeId) -> Result<NodeId> {
        let mut current = id;
        while let Some(owner) = self.node(current)?.owner {
            current = owner;
        }
        Ok(current)
    }

    fn translate_nodes(&mut self, ids: &[NodeId], dx: i32, dy: i32) -> Result<()> {
        for &id in ids {
            let node = self.node_mut(id)?;
            node.position = node.position.offset(dx, dy);
            self.scene.translate(ShapeTag::Node(id), dx, dy);
        }
        Ok(())
    }

    fn place_at(&mut self, id: NodeId, position: Point) -> Result<()> {
        let current = self.node(id)?.position;
        let (dx, dy) = (position.x - current.x, position.y - current.y);
        if dx != 0 || dy != 0 {
            let ids = self.subtree(id)?;
            self.translate_nodes(&ids, dx, dy)?;
        }
        Ok(())
    }

    /// Make `frame` the owner of `value`
    fn adopt(&mut self, frame: NodeId, value: NodeId) -> Result<()> {
        let previous = self.node(value)?.owner;
        if previous == Some(frame) {
            return Ok(());
        }
        if let Some(previous) = previous {
            self.node_mut(previous)?.children.retain(|&child| child != value);
        }
        self.node_mut(value)?.owner = Some(frame);
        self.node_mut(frame)?.children.push(value);
        Ok(())
    }

    /// Move a node and everything it owns, then re-route what touches them
    pub fn move_node(&mut self, id: NodeId, dx: i32, dy: i32) -> Result<()> {
        let ids = self.subtree(id)?;
        self.translate_nodes(&ids, dx, dy)?;
        for connector in self.incident_connectors(&ids) {
            self.update_connector(connector)?;
        }
        Ok(())
    }

    /// Start dragging; the gesture acts on the top-level owner of `node`
    pub fn begin_drag(&mut self, node: NodeId, pointer: Point) -> Result<NodeId> {
        let root = self.root_of(node)?;
        self.drag = Some(DragState {
            root,
            last_pointer: pointer,
        });
        debug!(node = %root, %pointer, "drag started");
        Ok(root)
    }

    /// Follow the pointer during a drag
    pub fn drag_to(&mut self, pointer: Point) -> Result<()> {
        let drag = self.drag.as_mut().ok_or(DiagramError::NoActiveDrag)?;
        let (dx, dy) = (pointer.x - drag.last_pointer.x, pointer.y - drag.last_pointer.y);
        drag.last_pointer = pointer;
        let root = drag.root;
        if dx == 0 && dy == 0 {
            return Ok(());
        }

        let ids = self.subtree(root)?;
        self.translate_nodes(&ids, dx, dy)?;
        let touching = self.incident_connectors(&ids);
        if self.config.reroute_during_drag {
            for id in touching {
                self.update_connector(id)?;
            }
            return Ok(());
        }

        for id in touching {
            let connector = self.connector(id)?;
            let rigid = ids.contains(&connector.head) && ids.contains(&connector.tail);
            if rigid {
                self.connector_mut(id)?.translate(dx, dy);
                self.scene.translate(ShapeTag::Connector(id), dx, dy);
            } else {
                self.connector_mut(id)?.dirty = true;
            }
        }
        Ok(())
    }

    /// Finish a drag: snap the dragged node to the grid and re-route fully
    pub fn end_drag(&mut self) -> Result<Point> {
        let drag = self.drag.take().ok_or(DiagramError::NoActiveDrag)?;
        let position = self.node(drag.root)?.position;
        let snapped = position.snapped();
        let ids = self.subtree(drag.root)?;
        self.translate_nodes(&ids, snapped.x - position.x, snapped.y - position.y)?;
        for id in self.incident_connectors(&ids) {
            self.update_connector(id)?;
        }
        debug!(node = %drag.root, position = %snapped, "drag finished");
        Ok(snapped)
    }

    // ---- destruction ----------------------------------------------------

    /// Remove a node, everything it owns and every connector touching them
    ///
    /// Destroying either side of a binding also removes that binding row
    /// from its frame; the remaining rows close up.
    pub fn destroy_node(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        let frames: Vec<NodeId> = self
            .nodes()
            .filter(|node| node.id != id)
            .filter(|node| {
                node.bindings()
                    .iter()
                    .any(|slot| slot.variable == id || slot.value == id)
            })
            .map(|node| node.id)
            .collect();

        for frame in &frames {
            let removed: Vec<BindingSlot> = {
                let bindings = self.frame_bindings_mut(*frame)?;
                let (gone, kept): (Vec<_>, Vec<_>) = bindings
                    .drain(..)
                    .partition(|slot| slot.variable == id || slot.value == id);
                *bindings = kept;
                gone
            };
            for slot in removed {
                for partner in [slot.variable, slot.value] {
                    if partner == id || self.node(partner).is_err() {
                        continue;
                    }
                    if self.node(partner)?.owner == Some(*frame) {
                        self.discard_node(partner)?;
                    }
                }
            }
        }

        self.discard_node(id)?;

        for frame in frames {
            if self.node(frame).is_ok() {
                self.relayout_frame(frame)?;
            }
        }
        Ok(())
    }

    fn relayout_frame(&mut self, frame: NodeId) -> Result<()> {
        let origin = self.frame(frame)?.position;
        let slots = self.frame(frame)?.bindings().to_vec();
        for (index, slot) in slots.iter().enumerate() {
            let (variable_at, value_at) = Node::binding_row_positions(origin, index + 1);
            self.place_at(slot.variable, variable_at)?;
            if self.node(slot.value)?.owner == Some(frame) {
                self.place_at(slot.value, value_at)?;
            }
        }
        self.redraw_node(frame)?;
        let ids = self.subtree(frame)?;
        for connector in self.incident_connectors(&ids) {
            self.update_connector(connector)?;
        }
        Ok(())
    }

    fn discard_node(&mut self, id: NodeId) -> Result<()> {
        let (children, connectors, owner) = {
            let node = self.node(id)?;
            (node.children.clone(), node.connectors.clone(), node.owner)
        };
        for child in children {
            if self.node(child).is_ok() {
                self.discard_node(child)?;
            }
        }
        for connector in connectors {
            if self.connector(connector).is_ok() {
                self.discard_connector(connector)?;
            }
        }
        if let Some(owner) = owner {
            if let Ok(owner) = self.node_mut(owner) {
                owner.children.retain(|&child| child != id);
            }
        }
        self.scene.clear(ShapeTag::Node(id));
        self.nodes[id.index()] = None;
        trace!(node = %id, "node destroyed");
        Ok(())
    }

    fn discard_connector(&mut self, id: ConnectorId) -> Result<()> {
        let (head, tail) = {
            let connector = self.connector(id)?;
            (connector.head, connector.tail)
        };
        for end in [head, tail] {
            if let Ok(node) = self.node_mut(end) {
                node.connectors.retain(|&c| c != id);
            }
        }
        self.scene.clear(ShapeTag::Connector(id));
        self.connectors[id.index()] = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OccupancyIndex;

    fn diagram() -> Diagram {
        Diagram::new(LayoutConfig::seeded(11))
    }

    #[test]
    fn test_first_frame_goes_to_first_position() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        assert_eq!(diagram.node(global).unwrap().position, Point::new(50, 50));
    }

    #[test]
    fn test_bind_value_lays_out_row() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let value = diagram.create_value(global, "1").unwrap();
        let binding = diagram.bind(global, "x", value).unwrap();

        let frame = diagram.node(global).unwrap();
        assert_eq!(frame.bindings().len(), 1);
        assert_eq!(frame.size().height, 60);
        assert_eq!(diagram.node(value).unwrap().position, Point::new(190, 70));

        let connector = diagram.connector(binding).unwrap();
        assert_eq!(connector.kind, ConnectorKind::Binding);
        assert_eq!(connector.head, value);
        let anchor = connector.cached_anchor().unwrap();
        assert!(diagram.node(value).unwrap().inbound_anchors().contains(&anchor));
        assert_eq!(connector.quality(), Some(RouteQuality::Complete));
    }

    #[test]
    fn test_rebinding_replaces_value() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let one = diagram.create_value(global, "1").unwrap();
        let two = diagram.create_value(global, "2").unwrap();
        diagram.bind(global, "x", one).unwrap();
        diagram.bind(global, "x", two).unwrap();

        assert_eq!(diagram.node(global).unwrap().bindings().len(), 1);
        assert_eq!(diagram.lookup(global, "x").unwrap(), Some(two));
        assert!(diagram.node(one).is_err());
        assert_eq!(
            diagram
                .connectors()
                .filter(|c| c.kind == ConnectorKind::Binding)
                .count(),
            1
        );
    }

    #[test]
    fn test_rejected_rebind_keeps_old_binding() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let value = diagram.create_value(global, "1").unwrap();
        let binding = diagram.bind(global, "x", value).unwrap();
        let variable = diagram.create_variable(global, "y").unwrap();

        let result = diagram.bind(global, "x", variable);
        assert!(matches!(result, Err(DiagramError::NotBindable { .. })));
        assert_eq!(diagram.lookup(global, "x").unwrap(), Some(value));
        assert!(diagram.node(value).is_ok());
        let slot = &diagram.node(global).unwrap().bindings()[0];
        assert_eq!(slot.connector, binding);
        assert!(diagram.connector(binding).is_ok());
    }

    #[test]
    fn test_frames_cannot_be_bound() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let call = diagram.create_frame(Some(global), "f1").unwrap();

        assert!(matches!(
            diagram.bind(global, "me", global),
            Err(DiagramError::NotBindable { .. })
        ));
        assert!(matches!(
            diagram.bind(global, "f", call),
            Err(DiagramError::NotBindable { .. })
        ));
        assert!(diagram.node(global).unwrap().bindings().is_empty());
        assert_eq!(diagram.node(call).unwrap().owner, None);
        // Both frames still move on their own
        diagram.move_node(global, 10, 0).unwrap();
        diagram.move_node(call, 0, 10).unwrap();
    }

    #[test]
    fn test_shared_function_spreads_anchors() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let function = diagram.create_function(global, "square", vec![]).unwrap();
        for name in ["a", "b", "c", "d", "e", "f"] {
            diagram.bind(global, name, function).unwrap();
        }

        // The two anchors are 190 apart, so five users on one of them
        // outweigh any distance advantage it has.
        let head = diagram.node(function).unwrap();
        let mut used: Vec<Point> = diagram
            .connectors()
            .filter(|c| c.kind == ConnectorKind::Binding && c.head == function)
            .filter_map(|c| c.anchor_for(head))
            .collect();
        assert_eq!(used.len(), 6);
        used.sort_by_key(|p| (p.x, p.y));
        used.dedup();
        assert_eq!(used.len(), head.inbound_anchors().len());
    }

    #[test]
    fn test_repeated_update_is_stable() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let call = diagram.create_frame(Some(global), "f1").unwrap();
        let function = diagram.create_function(global, "square", vec![]).unwrap();
        diagram.bind(global, "square", function).unwrap();
        diagram.bind(call, "g", function).unwrap();
        let value = diagram.create_value(call, "4").unwrap();
        diagram.bind(call, "x", value).unwrap();

        let ids: Vec<ConnectorId> = diagram.connectors().map(|c| c.id).collect();
        for id in ids {
            diagram.update_connector(id).unwrap();
            let first = diagram.connector(id).unwrap().clone();
            diagram.update_connector(id).unwrap();
            let second = diagram.connector(id).unwrap();
            assert_eq!(first.cached_anchor(), second.cached_anchor());
            assert_eq!(first.route(), second.route());
        }
    }

    #[test]
    fn test_call_frame_gets_static_link() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let call = diagram.create_frame(Some(global), "f1").unwrap();
        let link = diagram
            .connectors()
            .find(|c| c.kind == ConnectorKind::StaticLink)
            .unwrap();
        assert_eq!(link.head, global);
        assert_eq!(link.tail, call);
        assert!(diagram
            .node(global)
            .unwrap()
            .inbound_anchors()
            .contains(&link.cached_anchor().unwrap()));
    }

    #[test]
    fn test_variable_is_not_a_head() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let variable = diagram.create_variable(global, "x").unwrap();
        let value = diagram.create_value(global, "1").unwrap();
        let result = diagram.connect(ConnectorKind::Binding, variable, value);
        assert!(matches!(result, Err(DiagramError::NoInboundAnchors { .. })));
    }

    #[test]
    fn test_value_is_not_a_frame() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let value = diagram.create_value(global, "1").unwrap();
        assert!(matches!(
            diagram.create_frame(Some(value), "f1"),
            Err(DiagramError::NotAFrame { .. })
        ));
    }

    #[test]
    fn test_move_frame_moves_bindings_and_reroutes() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let value = diagram.create_value(global, "1").unwrap();
        let binding = diagram.bind(global, "x", value).unwrap();
        let before = diagram.node(value).unwrap().position;

        diagram.move_node(global, 100, 50).unwrap();
        assert_eq!(diagram.node(value).unwrap().position, before.offset(100, 50));
        let route = diagram.connector(binding).unwrap().route().unwrap().clone();
        let anchor = diagram.connector(binding).unwrap().cached_anchor().unwrap();
        assert_eq!(route.end(), Some(anchor));
        let variable = diagram.node(global).unwrap().bindings()[0].variable;
        assert_eq!(
            route.start(),
            Some(diagram.node(variable).unwrap().outbound_anchor())
        );
    }

    #[test]
    fn test_drag_child_drags_owner_and_snaps() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let value = diagram.create_value(global, "1").unwrap();
        diagram.bind(global, "x", value).unwrap();

        let root = diagram.begin_drag(value, Point::new(0, 0)).unwrap();
        assert_eq!(root, global);
        diagram.drag_to(Point::new(13, 7)).unwrap();
        diagram.drag_to(Point::new(27, 14)).unwrap();
        assert_eq!(diagram.node(global).unwrap().position, Point::new(77, 64));
        let snapped = diagram.end_drag().unwrap();
        assert_eq!(snapped, Point::new(80, 60));
        assert!(diagram.node(global).unwrap().position.is_grid_aligned());
        assert!(diagram.connectors().all(|c| !c.is_dirty()));
    }

    #[test]
    fn test_drag_without_gesture() {
        let mut diagram = diagram();
        assert!(matches!(diagram.drag_to(Point::new(1, 1)), Err(DiagramError::NoActiveDrag)));
        assert!(matches!(diagram.end_drag(), Err(DiagramError::NoActiveDrag)));
    }

    #[test]
    fn test_destroy_frame_removes_children_and_links() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let call = diagram.create_frame(Some(global), "f1").unwrap();
        let value = diagram.create_value(call, "3").unwrap();
        diagram.bind(call, "n", value).unwrap();

        diagram.destroy_node(call).unwrap();
        assert!(diagram.node(call).is_err());
        assert!(diagram.node(value).is_err());
        assert_eq!(diagram.connectors().count(), 0);
        assert_eq!(diagram.nodes().count(), 1);
        // Only the global frame's shapes remain
        let tag = ShapeTag::Node(global);
        assert!(diagram.scene().items().iter().all(|item| item.tag == tag));
    }

    #[test]
    fn test_destroy_bound_function_closes_rows() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let square = diagram.create_function(global, "square", vec!["x".into()]).unwrap();
        let one = diagram.create_value(global, "1").unwrap();
        diagram.bind(global, "square", square).unwrap();
        diagram.bind(global, "y", one).unwrap();

        diagram.destroy_node(square).unwrap();
        let frame = diagram.node(global).unwrap();
        assert_eq!(frame.bindings().len(), 1);
        assert_eq!(frame.bindings()[0].name, "y");
        let (_, first_row) = Node::binding_row_positions(frame.position, 1);
        assert_eq!(diagram.node(one).unwrap().position, first_row);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut diagram = diagram();
        let global = diagram.create_frame(None, "Global").unwrap();
        let value = diagram.create_value(global, "1").unwrap();
        diagram.destroy_node(value).unwrap();
        let next = diagram.create_value(global, "2").unwrap();
        assert_ne!(value, next);
    }

    #[test]
    fn test_zero_budget_falls_back_to_stub() {
        let config = LayoutConfig::seeded(5).with_max_expansions(0);
        let mut diagram = Diagram::new(config);
        let global = diagram.create_frame(None, "Global").unwrap();
        let value = diagram.create_value(global, "1").unwrap();
        let binding = diagram.bind(global, "x", value).unwrap();
        let connector = diagram.connector(binding).unwrap();
        assert_eq!(connector.quality(), Some(RouteQuality::Fallback));
        assert_eq!(connector.route().unwrap().points.len(), 2);
        assert!(diagram.scene().shape_count() > 0);
    }
}
