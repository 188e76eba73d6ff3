use std::process::Command;

use tempfile::TempDir;

fn regdump() -> Command {
    Command::new(env!("CARGO_BIN_EXE_regdump"))
}

#[test]
fn test_list_prints_every_dataset() {
    let output = regdump().arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for name in regdump::DATASET_NAMES {
        assert!(stdout.lines().any(|line| line.starts_with(&format!("{name}\t"))));
    }
}

#[test]
fn test_metadata_requires_single_dataset() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("meta.yml");
    std::fs::write(&metadata, "name: ee_ariregister\ntitle: Override\n").unwrap();

    let output = regdump()
        .args(["run", "ee_ariregister", "lv_business_register", "--metadata"])
        .arg(&metadata)
        .arg("--data-dir")
        .arg(dir.path().join("data"))
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .arg("--no-progress")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--metadata can only be used with a single dataset"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_unknown_dataset_fails() {
    let dir = TempDir::new().unwrap();
    let output = regdump()
        .args(["run", "nowhere_registry", "--no-progress", "--output-dir"])
        .arg(dir.path().join("out"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}
