// tests/smoke_clean.rs
use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn smoke_clean_removes_all_artifacts_and_reruns_cleanly() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let data = tmp.path().join("data");

    fs::create_dir_all(data.join("mirror/abc123"))?;
    fs::write(data.join("mirror/abc123/pkg.crx"), b"Cr24")?;
    fs::create_dir_all(data.join("extracted/abc123"))?;
    fs::write(data.join("extracted/abc123/background.js"), b"x")?;
    fs::write(data.join("manifest.txt"), "abc123/pkg.crx\n")?;

    let run = || {
        Command::cargo_bin("crxscan")
            .unwrap()
            .args(["clean", "--data-dir", data.to_str().unwrap()])
            .assert()
    };

    run().success();
    assert!(!data.join("manifest.txt").exists());
    assert!(!data.join("mirror").exists());
    assert!(!data.join("extracted").exists());

    // Second run finds nothing to remove and still succeeds
    run().success();
    Ok(())
}

#[test]
fn smoke_clean_leaves_unrelated_files_alone() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let data = tmp.path().join("data");
    fs::create_dir_all(&data)?;
    fs::write(data.join("notes.txt"), "keep me")?;
    fs::write(data.join("manifest.txt"), "old\n")?;

    Command::cargo_bin("crxscan")
        .unwrap()
        .args(["clean", "--data-dir", data.to_str().unwrap()])
        .assert()
        .success();

    assert!(data.join("notes.txt").is_file());
    assert!(!data.join("manifest.txt").exists());
    Ok(())
}
