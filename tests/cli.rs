//! Smoke tests for the command-line renderer.

extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn prints_usage() {
    Command::cargo_bin("escapetime")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mandelbrot"));
}

#[test]
fn renders_a_small_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frame.png");
    Command::cargo_bin("escapetime")
        .unwrap()
        .args(&[
            "--output",
            out.to_str().unwrap(),
            "--size",
            "64x48",
            "--iterations",
            "150",
            "--samples",
            "1",
            "--threads",
            "1",
        ])
        .assert()
        .success();
    let written = std::fs::metadata(&out).unwrap();
    assert!(written.len() > 0);
}

#[test]
fn rejects_an_unparsable_size() {
    Command::cargo_bin("escapetime")
        .unwrap()
        .args(&["--output", "frame.png", "--size", "enormous"])
        .assert()
        .failure();
}

#[test]
fn rejects_an_unknown_coder() {
    Command::cargo_bin("escapetime")
        .unwrap()
        .args(&["--output", "frame.png", "--coder", "mauve"])
        .assert()
        .failure();
}
