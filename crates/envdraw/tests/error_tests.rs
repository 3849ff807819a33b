//! Tests for core error types

use envdraw::core::{DiagramError, Point, RouteError};
use envdraw::diagram::{ConnectorId, NodeId};

#[test]
fn test_script_error() {
    let error = DiagramError::script_error("unexpected token".to_string(), 5, 10);
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Script error"));
    assert!(error_msg.contains("unexpected token"));
    assert!(error_msg.contains("line 5"));
    assert!(error_msg.contains("column 10"));
}

#[test]
fn test_unknown_ids() {
    let node = DiagramError::UnknownNode { id: NodeId::new(3) };
    assert_eq!(node.to_string(), "Unknown node: node3");

    let connector = DiagramError::UnknownConnector {
        id: ConnectorId::new(7),
    };
    assert_eq!(connector.to_string(), "Unknown connector: connector7");
}

#[test]
fn test_unknown_function() {
    let error = DiagramError::unknown_function("fib");
    assert!(matches!(error, DiagramError::UnknownFunction { ref name } if name == "fib"));
    assert_eq!(error.to_string(), "Unknown function: fib");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.trace");
    let error: DiagramError = io.into();
    assert!(error.to_string().contains("missing.trace"));
}

#[test]
fn test_route_error_display() {
    let error = RouteError::Unreachable {
        start: Point::new(0, 0),
        goal: Point::new(15, 0),
        expansions: 0,
    };
    let msg = error.to_string();
    assert!(msg.contains("(0, 0)"));
    assert!(msg.contains("(15, 0)"));
}

#[test]
fn test_errors_convert_to_anyhow() {
    fn fails() -> anyhow::Result<()> {
        let result: Result<(), DiagramError> = Err(DiagramError::CallStackUnderflow);
        result?;
        Ok(())
    }
    let error = fails().unwrap_err();
    assert!(error.downcast_ref::<DiagramError>().is_some());
}
