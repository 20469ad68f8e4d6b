use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

/// 2023-06-15T10:00:00Z
pub const TAKEN_EPOCH_SECONDS: i64 = 1_686_823_200;

pub fn phototime() -> Command {
    Command::cargo_bin("phototime").unwrap()
}

/// Write a media file with placeholder content.
pub fn write_media(temp_dir: &TempDir, name: &str) -> ChildPath {
    let media = temp_dir.child(name);
    media.write_binary(b"not really an image").unwrap();
    media
}

/// Write an export sidecar declaring when the photo was taken.
pub fn write_sidecar(temp_dir: &TempDir, name: &str, taken_epoch_seconds: i64) -> ChildPath {
    let sidecar = temp_dir.child(name);
    sidecar
        .write_str(&format!(
            r#"{{"title": "{}", "photoTakenTime": {{"timestamp": "{}", "formatted": "15 cze 2023"}}}}"#,
            name, taken_epoch_seconds
        ))
        .unwrap();
    sidecar
}

/// Run `scan --output json` and parse the report.
pub fn scan_json(temp_dir: &TempDir) -> serde_json::Value {
    let output = phototime()
        .arg("scan")
        .arg(temp_dir.path())
        .args(["--output", "json", "--utc-offset", "+00:00"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}
