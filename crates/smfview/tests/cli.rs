use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

fn smf_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn diagnostics_go_to_stderr() {
    let file = smf_file("v 0 0 0\nv 1 0 0\nv 0 1 0\nv bad\nf 1 2 99\n");
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_smfview"))
        .arg(file.path())
        .current_dir(dir.path())
        .env("RUST_LOG", "warn")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "{}", String::from_utf8_lossy(&output.stdout));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Skipping record: line 4: bad vertex record"), "{stderr}");
    assert!(stderr.contains("face index 99 out of range"), "{stderr}");
    assert!(stderr.contains("contains no valid faces"), "{stderr}");
}

#[test]
fn missing_model_fails_before_window() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_smfview"))
        .arg(dir.path().join("absent.smf"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot read SMF file"));
}
