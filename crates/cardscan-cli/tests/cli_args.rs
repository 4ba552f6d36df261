//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use assert_cmd::Command;
use predicates::prelude::*;

/// Writes a small valid PNG into a temp dir and returns the dir plus path.
fn synthetic_image() -> (tempfile::TempDir, std::path::PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("card.png");
    let img = image::RgbImage::from_pixel(32, 32, image::Rgb([200, 200, 190]));
    img.save(&path).unwrap();
    (temp_dir, path)
}

// === Missing/Invalid Argument Tests ===

#[test]
fn test_missing_image_shows_error() {
    let mut cmd = Command::cargo_bin("cardscan").unwrap();
    // No image argument at all - error goes to stderr
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No image specified"));
}

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("cardscan").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("scan").and(predicate::str::contains("models")));
}

// === Threshold Validation Tests ===

#[test]
fn test_score_threshold_above_one_rejected() {
    let mut cmd = Command::cargo_bin("cardscan").unwrap();
    cmd.arg("--score-threshold").arg("1.5").arg("card.png");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("0.0..=1.0").or(predicate::str::contains("invalid")));
}

#[test]
fn test_score_threshold_negative_rejected() {
    let mut cmd = Command::cargo_bin("cardscan").unwrap();
    cmd.arg("--score-threshold").arg("-0.1").arg("card.png");

    cmd.assert().failure();
}

#[test]
fn test_nms_threshold_non_numeric_rejected() {
    let mut cmd = Command::cargo_bin("cardscan").unwrap();
    cmd.arg("--nms-threshold").arg("abc").arg("card.png");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not a valid number"));
}

// === Missing Models Tests ===

#[test]
fn test_scan_without_models_suggests_fetch() {
    let (_guard, image) = synthetic_image();
    let empty_models = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("cardscan").unwrap();
    cmd.arg("scan")
        .arg(&image)
        .arg("--models-dir")
        .arg(empty_models.path());

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("cardscan models fetch"));
}

#[test]
fn test_default_invocation_without_models_fails() {
    let (_guard, image) = synthetic_image();
    let empty_models = tempfile::tempdir().unwrap();

    // Scan is also the default command when no subcommand is given.
    let mut cmd = Command::cargo_bin("cardscan").unwrap();
    cmd.arg(&image).arg("--models-dir").arg(empty_models.path());

    cmd.assert().code(2);
}

// === Models Subcommand Tests ===

#[test]
fn test_models_path_prints_directory() {
    let models_dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("cardscan").unwrap();
    cmd.arg("models").arg("path");
    cmd.env("XDG_DATA_HOME", models_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_models_list_reports_install_status() {
    let mut cmd = Command::cargo_bin("cardscan").unwrap();
    cmd.arg("models").arg("list");

    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("face_locator")
                .and(predicate::str::contains("landmarks68"))
                .and(predicate::str::contains("models installed")),
        );
}
