use assert_cmd::Command;
use image::{ImageFormat, Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;

fn qr_outline() -> Command {
    Command::cargo_bin("qr-outline").unwrap()
}

#[test]
fn missing_file_argument_fails() {
    qr_outline()
        .arg("--verbose")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn unknown_flag_fails() {
    qr_outline()
        .args(["-f", "x.png", "--frobnicate"])
        .assert()
        .code(1);
}

#[test]
fn help_succeeds() {
    qr_outline()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--file"));
}

#[test]
fn nonexistent_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("missing.png");

    qr_outline()
        .arg("-f")
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Failed to open input file"));
}

#[test]
fn blank_image_is_copied() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("blank.gif");
    let source = RgbImage::from_pixel(120, 90, Rgb([255, 255, 255]));
    source.save_with_format(&input, ImageFormat::Png).unwrap();

    qr_outline()
        .arg("--file")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = image::open(dir.path().join("blank_detected.png"))
        .unwrap()
        .to_rgb8();
    assert_eq!(written, source);
}
