use assert_cmd::{cargo_bin, prelude::*};
use std::process::Command;
use tempfile::TempDir;

const FIXTURES: &str = "../tests/fixtures/cube";

#[test]
fn test_cube2fasttrips() {
    let output_dir = TempDir::new().expect("create temp dir failed");
    Command::new(cargo_bin!("cube2fasttrips"))
        .arg("--input")
        .arg(format!("{}/base", FIXTURES))
        .arg("--config")
        .arg(format!("{}/config.json", FIXTURES))
        .arg("--output")
        .arg(output_dir.path().to_str().unwrap())
        .assert()
        .success();
    assert!(output_dir.path().join("routes_ft.txt").is_file());
    assert!(output_dir.path().join("fare_attributes_ft.txt").is_file());
}

#[test]
fn test_cube2fasttrips_merge_and_write_cube() {
    let output_dir = TempDir::new().expect("create temp dir failed");
    let cube_dir = output_dir.path().join("cube");
    Command::new(cargo_bin!("cube2fasttrips"))
        .arg("--input")
        .arg(format!("{}/base", FIXTURES))
        .arg("--input")
        .arg(format!("{}/project/project.lin", FIXTURES))
        .arg("--insert-replace")
        .arg("--node-names")
        .arg(format!("{}/node_names.csv", FIXTURES))
        .arg("--highway")
        .arg(format!("{}/highway", FIXTURES))
        .arg("--cube-output")
        .arg(cube_dir.to_str().unwrap())
        .arg("--name")
        .arg("build")
        .arg("--output")
        .arg(output_dir.path().join("fasttrips").to_str().unwrap())
        .assert()
        .success();
    let lines = std::fs::read_to_string(cube_dir.join("build.lin")).unwrap();
    assert_eq!(1, lines.matches("NAME=\"MUN14I\"").count());
    assert!(lines.contains("NAME=\"NEW1\""));
    assert!(!lines.contains("From: base"));
    assert_eq!(
        vec!["muni.lin", "project.lin"],
        lines
            .lines()
            .filter_map(|l| l.split("From: ").nth(1))
            .map(|l| l.split(' ').next().unwrap())
            .collect::<Vec<_>>()
    );
    assert!(cube_dir.join("build.fare").is_file());
    let stops = std::fs::read_to_string(output_dir.path().join("fasttrips/stops_ft.txt")).unwrap();
    assert!(stops.contains("Mission & 16th"));
}

#[test]
fn test_cube2fasttrips_refuses_existing_files() {
    let output_dir = TempDir::new().expect("create temp dir failed");
    let run = || {
        Command::new(cargo_bin!("cube2fasttrips"))
            .arg("--input")
            .arg(format!("{}/base/muni.lin", FIXTURES))
            .arg("--output")
            .arg(output_dir.path().to_str().unwrap())
            .arg("--on-existing")
            .arg("abort")
            .assert()
    };
    run().success();
    run().failure();
}

#[test]
fn test_cube2fasttrips_invalid_input() {
    let output_dir = TempDir::new().expect("create temp dir failed");
    Command::new(cargo_bin!("cube2fasttrips"))
        .arg("--input")
        .arg(format!("{}/config.json", FIXTURES))
        .arg("--output")
        .arg(output_dir.path().to_str().unwrap())
        .assert()
        .failure();
}
