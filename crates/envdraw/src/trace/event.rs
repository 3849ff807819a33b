//! Trace events consumed by the tracker

use std::fmt;

use serde::Serialize;

/// The right-hand side of an assignment or return binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "lowercase")]
pub enum TraceValue {
    /// A bare token; may name a defined function
    Token(String),
    /// A double-quoted string, never a function reference
    Quoted(String),
}

impl TraceValue {
    /// The token, if this value could name a function
    pub fn as_name(&self) -> Option<&str> {
        match self {
            TraceValue::Token(token) => Some(token),
            TraceValue::Quoted(_) => None,
        }
    }
}

impl fmt::Display for TraceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceValue::Token(token) => write!(f, "{}", token),
            TraceValue::Quoted(text) => write!(f, "\"{}\"", text),
        }
    }
}

/// One step of program execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TraceEvent {
    /// A function definition in the current frame
    Define { name: String, args: Vec<String> },
    /// A name bound in the current frame
    Assign { name: String, value: TraceValue },
    /// Entry into a call; `args` bind the function's parameters in order
    EnterCall {
        function: String,
        args: Vec<TraceValue>,
    },
    /// Return from the current call after binding its final locals
    ExitCall { bindings: Vec<(String, TraceValue)> },
}

impl TraceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TraceEvent::Define { .. } => "define",
            TraceEvent::Assign { .. } => "assign",
            TraceEvent::EnterCall { .. } => "enter-call",
            TraceEvent::ExitCall { .. } => "exit-call",
        }
    }
}

/// A parsed event with the script line it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub line: usize,
    #[serde(flatten)]
    pub event: TraceEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(TraceValue::Token("42".to_string()).to_string(), "42");
        assert_eq!(TraceValue::Quoted("hi".to_string()).to_string(), "\"hi\"");
    }

    #[test]
    fn test_only_tokens_name_functions() {
        assert_eq!(TraceValue::Token("square".to_string()).as_name(), Some("square"));
        assert_eq!(TraceValue::Quoted("square".to_string()).as_name(), None);
    }
}
