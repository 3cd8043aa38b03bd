//! Exercises the annotate-and-publish path with a stub annotator standing in
//! for ImageMagick, so the atomicity properties hold independently of what
//! is installed on the host.
#![cfg(unix)]

use std::path::{Path, PathBuf};

use nextmap_lib::{publish, AnnotateOptions, SnapError};
use tempfile::TempDir;

/// Writes an executable shell script that records its output-path argument
/// and copies stdin to it, mimicking `convert - ... <path>`.
fn write_stub_annotator(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("stub-convert");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write stub");
    let mut perms = std::fs::metadata(&path).expect("stat stub").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod stub");
    path
}

fn copying_stub(dir: &Path) -> AnnotateOptions {
    let script = write_stub_annotator(
        dir,
        r#"eval "dest=\${$#}"
printf '%s' "$dest" > "$(dirname "$0")/lastarg.txt"
cat > "$dest""#,
    );
    AnnotateOptions {
        command: script.to_string_lossy().into_owned(),
        ..AnnotateOptions::default()
    }
}

#[tokio::test]
async fn publish_writes_destination_through_a_sibling_temp_file() {
    let stub_dir = TempDir::new().expect("stub dir");
    let out_dir = TempDir::new().expect("out dir");
    let out = out_dir.path().join("map.png");
    let options = copying_stub(stub_dir.path());

    publish(b"annotated image bytes", &out, "label", &options)
        .await
        .expect("publish");

    assert_eq!(std::fs::read(&out).expect("read out"), b"annotated image bytes");

    // The annotator was handed a temp path in the destination's directory,
    // suffixed after the destination name, not the destination itself.
    let temp_path =
        PathBuf::from(std::fs::read_to_string(stub_dir.path().join("lastarg.txt")).unwrap());
    assert_eq!(temp_path.parent(), out.parent());
    let temp_name = temp_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(temp_name.starts_with("nextmap-"), "got: {temp_name}");
    assert!(temp_name.ends_with(".map.png"), "got: {temp_name}");
    assert_ne!(temp_path, out);

    // And the temp file is gone after the rename.
    assert!(!temp_path.exists());
    let mut entries: Vec<String> = std::fs::read_dir(out_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["map.png"]);
}

#[tokio::test]
async fn publish_replaces_existing_destination() {
    let stub_dir = TempDir::new().expect("stub dir");
    let out_dir = TempDir::new().expect("out dir");
    let out = out_dir.path().join("map.png");
    std::fs::write(&out, b"yesterday's map").expect("seed destination");
    let options = copying_stub(stub_dir.path());

    publish(b"today's map", &out, "label", &options)
        .await
        .expect("publish");

    assert_eq!(std::fs::read(&out).expect("read out"), b"today's map");
}

#[tokio::test]
async fn failing_annotator_leaves_destination_and_directory_clean() {
    let stub_dir = TempDir::new().expect("stub dir");
    let out_dir = TempDir::new().expect("out dir");
    let out = out_dir.path().join("map.png");
    std::fs::write(&out, b"previous snapshot").expect("seed destination");

    let script = write_stub_annotator(stub_dir.path(), "exit 3");
    let options = AnnotateOptions {
        command: script.to_string_lossy().into_owned(),
        ..AnnotateOptions::default()
    };

    let err = publish(b"new bytes", &out, "label", &options)
        .await
        .unwrap_err();

    assert!(matches!(err, SnapError::Annotate(_)), "got {err:?}");
    assert_eq!(
        std::fs::read(&out).expect("read destination"),
        b"previous snapshot"
    );
    let mut entries: Vec<String> = std::fs::read_dir(out_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["map.png"], "no temp file may survive a failed run");
}
