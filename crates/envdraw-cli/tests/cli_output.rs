//! End-to-end tests that run the envdraw binary on trace files

use std::process::Command;

/// Run the CLI with `args`, feeding `input` through a temporary trace file
fn run_cli(args: &[&str], input: &str) -> Result<(bool, String, String), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let input_path = temp_dir.path().join("input.trace");
    std::fs::write(&input_path, input)?;

    let output = Command::new(env!("CARGO_BIN_EXE_envdraw"))
        .args(args)
        .arg("--input")
        .arg(&input_path)
        .env_remove("RUST_LOG")
        .env_remove("ENVDRAW_LOG_LEVEL")
        .output()?;

    Ok((
        output.status.success(),
        String::from_utf8(output.stdout)?,
        String::from_utf8(output.stderr)?,
    ))
}

const SCRIPT: &str = "def square(x)\nset n = 4\ncall square(n)\nreturn result = 16\n";

#[test]
fn test_render_text_preview() {
    let (ok, stdout, stderr) = run_cli(&["render", "--seed", "5"], SCRIPT).unwrap();
    assert!(ok, "render failed: {}", stderr);
    assert!(stdout.contains("Global"));
    assert!(stdout.contains("f1: square"));
    assert!(stdout.contains("square(x):"));
}

#[test]
fn test_render_ascii_style() {
    let (ok, stdout, _) = run_cli(&["render", "--seed", "5", "--style", "ascii"], SCRIPT).unwrap();
    assert!(ok);
    assert!(stdout.is_ascii());
}

#[test]
fn test_render_json_snapshot() {
    let (ok, stdout, _) = run_cli(&["render", "--seed", "5", "--format", "json"], SCRIPT).unwrap();
    assert!(ok);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["config"]["seed"], 5);
    assert!(json["nodes"].as_array().unwrap().len() >= 6);
}

#[test]
fn test_render_is_reproducible_with_seed() {
    let (_, first, _) = run_cli(&["render", "--seed", "11"], SCRIPT).unwrap();
    let (_, second, _) = run_cli(&["render", "--seed", "11"], SCRIPT).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_check_valid_and_invalid() {
    let (ok, stdout, _) = run_cli(&["check"], SCRIPT).unwrap();
    assert!(ok);
    assert!(stdout.contains("4 events"));

    let (ok, stdout, stderr) = run_cli(&["check"], "set x 1\n").unwrap();
    assert!(!ok);
    assert!(stdout.contains("Invalid trace"));
    assert!(stderr.contains("line 1"));
}

#[test]
fn test_route_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_envdraw"))
        .args(["route", "--from", "100,100", "--to", "300,100"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim(), "(100, 100) -> (300, 100)");
}
