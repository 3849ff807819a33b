//! Call-stack tracker
//!
//! Drives a [`Diagram`] from trace events. The global frame sits at the bottom
//! of an explicit call stack; every call pushes a new frame whose static
//! parent is the frame the function was defined in.

use std::collections::HashMap;

use tracing::{debug, info, info_span, warn};

use super::{TraceEvent, TraceStep, TraceValue};
use crate::core::{DiagramError, LayoutConfig};
use crate::diagram::{Diagram, NodeId};

type Result<T> = std::result::Result<T, DiagramError>;

/// Label of the bottom frame
pub const GLOBAL_FRAME_LABEL: &str = "Global";

/// A defined function and the frame it closes over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    pub node: NodeId,
    pub static_frame: NodeId,
    pub params: Vec<String>,
}

/// Replays trace events into a diagram
#[derive(Debug, Clone)]
pub struct Tracker {
    diagram: Diagram,
    global: NodeId,
    /// Call frames above the global frame, innermost last
    calls: Vec<NodeId>,
    functions: HashMap<String, FunctionEntry>,
    /// Number of calls entered so far, used for frame labels
    call_count: usize,
}

impl Tracker {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        Self::with_diagram(Diagram::new(config))
    }

    /// Start tracking on an existing diagram, adding a fresh global frame
    pub fn with_diagram(mut diagram: Diagram) -> Result<Self> {
        let global = diagram.create_frame(None, GLOBAL_FRAME_LABEL)?;
        Ok(Self {
            diagram,
            global,
            calls: Vec::new(),
            functions: HashMap::new(),
            call_count: 0,
        })
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn diagram_mut(&mut self) -> &mut Diagram {
        &mut self.diagram
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    pub fn global_frame(&self) -> NodeId {
        self.global
    }

    /// The innermost active frame
    pub fn current_frame(&self) -> NodeId {
        self.calls.last().copied().unwrap_or(self.global)
    }

    /// Number of active calls above the global frame
    pub fn depth(&self) -> usize {
        self.calls.len()
    }

    pub fn function(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.get(name)
    }

    /// Apply a single event
    pub fn apply(&mut self, event: &TraceEvent) -> Result<()> {
        match event {
            TraceEvent::Define { name, args } => self.define(name, args),
            TraceEvent::Assign { name, value } => {
                let frame = self.current_frame();
                self.bind_value(frame, name, value)
            }
            TraceEvent::EnterCall { function, args } => self.enter_call(function, args),
            TraceEvent::ExitCall { bindings } => self.exit_call(bindings),
        }
    }

    /// Apply parsed steps in order, stopping at the first failure
    pub fn replay(&mut self, steps: &[TraceStep]) -> Result<()> {
        let _span = info_span!("replay", steps = steps.len()).entered();
        for step in steps {
            self.apply(&step.event).inspect_err(|e| {
                warn!(line = step.line, event = step.event.name(), error = %e, "trace replay failed");
            })?;
        }
        info!(
            calls = self.call_count,
            depth = self.depth(),
            nodes = self.diagram.nodes().count(),
            connectors = self.diagram.connectors().count(),
            "trace replayed"
        );
        Ok(())
    }

    fn define(&mut self, name: &str, params: &[String]) -> Result<()> {
        let frame = self.current_frame();
        let node = self.diagram.create_function(frame, name, params.to_vec())?;
        self.diagram.bind(frame, name, node)?;
        debug!(function = name, %node, %frame, "function defined");
        self.functions.insert(
            name.to_string(),
            FunctionEntry {
                node,
                static_frame: frame,
                params: params.to_vec(),
            },
        );
        Ok(())
    }

    /// Bind `name` to a defined function when `value` names one, else to a new value
    fn bind_value(&mut self, frame: NodeId, name: &str, value: &TraceValue) -> Result<()> {
        let function = value
            .as_name()
            .and_then(|token| self.functions.get(token))
            .map(|entry| entry.node);
        let target = match function {
            Some(node) => node,
            None => self.diagram.create_value(frame, value.to_string())?,
        };
        self.diagram.bind(frame, name, target)?;
        Ok(())
    }

    fn enter_call(&mut self, function: &str, args: &[TraceValue]) -> Result<()> {
        let entry = self
            .functions
            .get(function)
            .cloned()
            .ok_or_else(|| DiagramError::unknown_function(function))?;

        self.call_count += 1;
        let label = format!("f{}: {}", self.call_count, function);
        let frame = self.diagram.create_frame(Some(entry.static_frame), label)?;
        self.calls.push(frame);
        debug!(function, %frame, depth = self.depth(), "call entered");

        if args.len() != entry.params.len() {
            warn!(
                function,
                expected = entry.params.len(),
                given = args.len(),
                "argument count mismatch"
            );
        }
        for (param, arg) in entry.params.iter().zip(args) {
            self.bind_value(frame, param, arg)?;
        }
        Ok(())
    }

    fn exit_call(&mut self, bindings: &[(String, TraceValue)]) -> Result<()> {
        let frame = *self.calls.last().ok_or(DiagramError::CallStackUnderflow)?;
        for (name, value) in bindings {
            self.bind_value(frame, name, value)?;
        }
        self.calls.pop();
        debug!(%frame, depth = self.depth(), "call returned");
        Ok(())
    }
}
