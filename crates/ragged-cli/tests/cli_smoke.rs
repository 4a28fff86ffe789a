//! CLI binary smoke tests using assert_cmd.
//!
//! These tests run the compiled `ragged` binary against small archives written
//! with the library's own persistence functions.

use std::fs::File;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use ndarray::{array, Array1};
use ndarray_npy::NpzWriter;
use predicates::prelude::*;
use ragged_array::io::{load, save, save_plain};
use ragged_array::RaggedArray;

fn cmd() -> Command {
    Command::cargo_bin("ragged").unwrap()
}

fn ragged_archive(dir: &Path) -> PathBuf {
    let path = dir.join("ragged.npz");
    let a = RaggedArray::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0]]);
    save(&path, &a).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("pack"))
        .stdout(predicate::str::contains("select"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ragged"));
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

#[test]
fn inspect_ragged_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = ragged_archive(dir.path());
    cmd()
        .arg("inspect")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("rows: 2"))
        .stdout(predicate::str::contains("lengths: [3, 2]"))
        .stdout(predicate::str::contains("RaggedArray(["));
}

#[test]
fn inspect_plain_style() {
    let dir = tempfile::tempdir().unwrap();
    let path = ragged_archive(dir.path());
    cmd()
        .args(["inspect", "--style", "plain"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[ [1.0, 2.0, 3.0],"));
}

#[test]
fn inspect_plain_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.npz");
    save_plain(&path, &array![[1i64, 2], [3, 4]]).unwrap();
    cmd()
        .args(["inspect", "--dtype", "i64"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("plain array of shape [2, 2]"));
}

#[test]
fn inspect_nonexistent_archive_errors() {
    cmd()
        .args(["inspect", "/nonexistent/data.npz"])
        .assert()
        .failure();
}

#[test]
fn inspect_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    File::create(&path).unwrap();
    cmd()
        .arg("inspect")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains(".npz extension"));
}

// ---------------------------------------------------------------------------
// pack
// ---------------------------------------------------------------------------

#[test]
fn pack_all_keys() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("entries.npz");
    let mut npz = NpzWriter::new(File::create(&input).unwrap());
    npz.add_array("first", &Array1::from(vec![1.0, 2.0])).unwrap();
    npz.add_array("second", &Array1::from(vec![3.0])).unwrap();
    npz.finish().unwrap();

    let output = dir.path().join("packed.npz");
    cmd()
        .args(["pack", "--all-keys", "-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("packed 2 rows"));

    let packed = load::<f64, _>(&output).unwrap().into_ragged().unwrap();
    assert_eq!(packed.to_vecs(), vec![vec![1.0, 2.0], vec![3.0]]);
}

#[test]
fn pack_without_keys_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = ragged_archive(dir.path());
    cmd()
        .args(["pack", "-o", "/tmp/never-written.npz"])
        .arg(&path)
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// select
// ---------------------------------------------------------------------------

#[test]
fn select_single_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = ragged_archive(dir.path());
    cmd()
        .args(["select", "--rows", "-1"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[4.0, 5.0]"));
}

#[test]
fn select_column_slice_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = ragged_archive(dir.path());
    let output = dir.path().join("tails.npz");
    cmd()
        .args(["select", "--rows", ":", "--cols", "1:", "-o"])
        .arg(&output)
        .arg(&path)
        .assert()
        .success();

    let tails = load::<f64, _>(&output).unwrap().into_ragged().unwrap();
    assert_eq!(tails.to_vecs(), vec![vec![2.0, 3.0], vec![5.0]]);
}

#[test]
fn select_out_of_bounds_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = ragged_archive(dir.path());
    cmd()
        .args(["select", "--rows", "1", "--cols", "2"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of bounds"));
}
