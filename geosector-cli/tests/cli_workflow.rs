//! Integration tests for the command-line workflow.
//!
//! These tests run the built `geosector` binary against temporary config,
//! boundary and results files: configure, inspect, analyze, then report.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const BOUNDARY: &str = r#"{
    "type": "FeatureCollection",
    "features": [{
        "type": "Feature",
        "properties": { "shapeName": "Box" },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [0.1, 0.0], [0.1, 0.1], [0.0, 0.1], [0.0, 0.0]]]
        }
    }]
}"#;

/// Temporary workspace with its own config file and log location.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let workspace = Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        };
        let log = workspace.path("geosector.log");
        let output = workspace.run(&["config", "set", "logging.file", log.to_str().unwrap()]);
        assert_success(&output, "config set logging.file");
        fs::write(workspace.path("boundary.geojson"), BOUNDARY).unwrap();
        workspace
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> PathBuf {
        self.path("config.ini")
    }

    /// Run the CLI with `--config` pointing into the workspace.
    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_geosector"))
            .args(args)
            .arg("--config")
            .arg(self.config())
            .output()
            .expect("Failed to execute CLI command")
    }
}

/// Assert a command succeeded.
fn assert_success(output: &Output, context: &str) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!(
            "{} failed:\nstdout: {}\nstderr: {}",
            context, stdout, stderr
        );
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn as_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// `(sector_id, vertex_id)` pairs from a results file.
fn intersection_pairs(results: &serde_json::Value) -> Vec<(u64, u64)> {
    results["intersections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| {
            (
                record["sector_id"].as_u64().unwrap(),
                record["vertex_id"].as_u64().unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_config_round_trip() {
    let ws = Workspace::new();

    assert_success(&ws.run(&["config", "set", "grid.size_km", "2.22"]), "config set");
    let output = ws.run(&["config", "get", "grid.size_km"]);
    assert_success(&output, "config get");
    assert_eq!(stdout(&output).trim(), "2.22");

    let output = ws.run(&["config", "path"]);
    assert_eq!(stdout(&output).trim(), as_str(&ws.config()));

    let output = ws.run(&["config", "list"]);
    assert!(stdout(&output).contains("[sector]"));
}

#[test]
fn test_unknown_config_key_fails() {
    let ws = Workspace::new();
    let output = ws.run(&["config", "get", "grid.colour"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown configuration key"));
}

#[test]
fn test_analyze_then_report() {
    let ws = Workspace::new();
    let results = ws.path("out/results.json");
    let geojson = ws.path("out/coverage.geojson");

    let output = ws.run(&[
        "analyze",
        as_str(&ws.path("boundary.geojson")),
        "--grid-size",
        "2.22",
        "--center-lat",
        "0",
        "--output",
        as_str(&results),
        "--geojson-output",
        as_str(&geojson),
    ]);
    assert_success(&output, "analyze");
    assert!(stdout(&output).contains("Intersections:"));
    assert!(results.exists());
    assert!(geojson.exists());
    assert!(ws.path("geosector.log").exists());

    let output = ws.run(&["report", as_str(&results)]);
    assert_success(&output, "report");
    let text = stdout(&output);
    assert!(text.contains("features:      1"));
    assert!(text.contains("grid#1 (2.22 km)"));
}

#[test]
fn test_resume_keeps_intersections_unique() {
    let ws = Workspace::new();
    let results = ws.path("results.json");
    let boundary = ws.path("boundary.geojson");
    let analyze = |extra: &[&str]| {
        let mut args = vec![
            "analyze",
            as_str(&boundary),
            "--grid-size",
            "2.22",
            "--center-lat",
            "0",
            "--output",
            as_str(&results),
        ];
        args.extend_from_slice(extra);
        ws.run(&args)
    };

    assert_success(&analyze(&[]), "first analyze");
    let first: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&results).unwrap()).unwrap();

    assert_success(&analyze(&["--resume"]), "resumed analyze");
    let second: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&results).unwrap()).unwrap();

    // A resumed run adds a second grid; ids keep increasing.
    assert_eq!(second["grids"].as_array().unwrap().len(), 2);
    assert_eq!(
        second["squares"].as_array().unwrap().len(),
        2 * first["squares"].as_array().unwrap().len()
    );

    let first_pairs = intersection_pairs(&first);
    let second_pairs = intersection_pairs(&second);
    let unique: BTreeSet<(u64, u64)> = second_pairs.iter().copied().collect();
    assert!(!first_pairs.is_empty());
    assert_eq!(unique.len(), second_pairs.len(), "duplicate intersection pairs");
    assert!(first_pairs.iter().all(|pair| unique.contains(pair)));
    assert_eq!(second_pairs.len(), 2 * first_pairs.len());
}

#[test]
fn test_inspect_boundary() {
    let ws = Workspace::new();
    let output = ws.run(&["inspect", as_str(&ws.path("boundary.geojson"))]);
    assert_success(&output, "inspect");
    let text = stdout(&output);
    assert!(text.contains("1. Box"));
    assert!(text.contains("north lat=0.1,"));
}

#[test]
fn test_missing_boundary_fails() {
    let ws = Workspace::new();
    let output = ws.run(&["analyze", as_str(&ws.path("nope.geojson"))]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load boundary"));
}
