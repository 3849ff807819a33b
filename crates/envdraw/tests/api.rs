//! Integration tests for the public API

use envdraw::prelude::*;
use envdraw::{parse, render, render_with_config, render_with_style};

#[test]
fn test_render_bindings() {
    let ascii = render("set x = 10\nset name = \"Ada\"").unwrap();
    assert!(ascii.contains("Global"));
    assert!(ascii.contains("x:"));
    assert!(ascii.contains("10"));
    assert!(ascii.contains("\"Ada\""));
}

#[test]
fn test_render_empty_script() {
    // The global frame is always drawn
    let ascii = render("").unwrap();
    assert!(ascii.contains("Global"));
}

#[test]
fn test_render_with_style_ascii_only() {
    let ascii = render_with_style("def f(a)\ncall f(1)", CharacterSet::Ascii).unwrap();
    assert!(ascii.is_ascii());
    assert!(ascii.contains("f(a):"));
}

#[test]
fn test_render_with_config_seed_is_stable() {
    let script = "def f(a)\ncall f(1)\nreturn\ncall f(2)";
    let a = render_with_config(script, LayoutConfig::seeded(42), CharacterSet::Unicode).unwrap();
    let b = render_with_config(script, LayoutConfig::seeded(42), CharacterSet::Unicode).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_parse_reports_lines() {
    let steps = parse("set a = 1\n\n# note\ncall g").unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].line, 4);
    assert_eq!(
        steps[1].event,
        TraceEvent::EnterCall {
            function: "g".to_string(),
            args: vec![],
        }
    );
}

#[test]
fn test_diagram_drag_session() {
    let mut diagram = Diagram::new(LayoutConfig::seeded(2));
    let global = diagram.create_frame(None, "Global").unwrap();
    let value = diagram.create_value(global, "1").unwrap();
    let connector = diagram.bind(global, "x", value).unwrap();

    // Grabbing the value drags the frame that owns it
    let root = diagram.begin_drag(value, Point::new(0, 0)).unwrap();
    assert_eq!(root, global);
    assert!(diagram.is_dragging());
    diagram.drag_to(Point::new(33, 17)).unwrap();
    let origin = diagram.end_drag().unwrap();
    assert_eq!(origin, Point::new(80, 70));
    assert!(!diagram.is_dragging());

    let head = diagram.node(value).unwrap();
    let connector = diagram.connector(connector).unwrap();
    assert!(connector.anchor_for(head).is_some());
}

#[test]
fn test_destroy_frame_cascades() {
    let mut diagram = Diagram::new(LayoutConfig::seeded(2));
    let global = diagram.create_frame(None, "Global").unwrap();
    let call = diagram.create_frame(Some(global), "f1: g").unwrap();
    let value = diagram.create_value(call, "1").unwrap();
    diagram.bind(call, "v", value).unwrap();

    diagram.destroy_node(call).unwrap();
    assert_eq!(diagram.nodes().count(), 1);
    assert_eq!(diagram.connectors().count(), 0);
    assert!(matches!(
        diagram.node(value),
        Err(DiagramError::UnknownNode { .. })
    ));
}

#[test]
fn test_json_renderer_through_trait() {
    let diagram = envdraw::replay("set x = 1", LayoutConfig::seeded(2)).unwrap();
    let renderer = JsonRenderer::new();
    assert_eq!(renderer.name(), "json");
    let json: serde_json::Value = serde_json::from_str(&renderer.render(&diagram).unwrap()).unwrap();
    assert_eq!(json["connectors"][0]["kind"], "binding");
}
