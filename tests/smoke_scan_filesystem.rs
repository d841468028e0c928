// tests/smoke_scan_filesystem.rs
//
// Drives the filesystem-scan orchestrator against warm local state with a
// stand-in scanner, so no network or AWS credentials are involved.
#![cfg(unix)]

use std::{fs, os::unix::fs::PermissionsExt, path::Path};

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::tempdir;

const MARKER: &str = ".crxscan-complete";

/// Write a stand-in scanner that records its arguments and exits with
/// whatever `FAKE_EXIT` asks for.
fn write_fake_scanner(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("fake-trufflehog");
    fs::write(
        &path,
        "#!/bin/sh\necho \"$@\" >> \"$ARGS_LOG\"\nexit \"${FAKE_EXIT:-0}\"\n",
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Mirror and extraction trees with completion markers, as a finished
/// download + unzip run would leave them.
fn warm_data_dir(data: &Path) {
    for dir in ["mirror", "extracted"] {
        fs::create_dir_all(data.join(dir)).unwrap();
        fs::write(data.join(dir).join(MARKER), "warm\n").unwrap();
    }
    fs::write(data.join("extracted/secrets.js"), "const k = 'sk-123';\n").unwrap();
}

#[test]
fn smoke_scan_filesystem_skips_warm_stages_and_invokes_scanner() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let data = tmp.path().join("data");
    warm_data_dir(&data);
    let scanner = write_fake_scanner(tmp.path());
    let args_log = tmp.path().join("args.log");

    Command::cargo_bin("crxscan")?
        .args([
            "scan-filesystem",
            "--bucket",
            "unused-bucket",
            "--scanner-bin",
            scanner.to_str().unwrap(),
            "--data-dir",
            data.to_str().unwrap(),
        ])
        .env("ARGS_LOG", &args_log)
        .assert()
        .success()
        .stderr(contains("skipping download").and(contains("skipping unzip")));

    // Both stages were skipped: no manifest was written
    assert!(!data.join("manifest.txt").exists());

    // The scanner ran once, in filesystem mode, against the extraction tree
    let log = fs::read_to_string(&args_log)?;
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("filesystem"));
    assert!(log.contains("extracted"));
    Ok(())
}

#[test]
fn smoke_scan_filesystem_passes_the_scanner_exit_code_through() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let data = tmp.path().join("data");
    warm_data_dir(&data);
    let scanner = write_fake_scanner(tmp.path());

    Command::cargo_bin("crxscan")?
        .args([
            "scan-filesystem",
            "--bucket",
            "unused-bucket",
            "--scanner-bin",
            scanner.to_str().unwrap(),
            "--data-dir",
            data.to_str().unwrap(),
        ])
        .env("ARGS_LOG", tmp.path().join("args.log"))
        .env("FAKE_EXIT", "183")
        .assert()
        .code(183);
    Ok(())
}

#[test]
fn smoke_scan_filesystem_extracts_when_only_the_mirror_is_warm() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let data = tmp.path().join("data");

    // Warm mirror holding one archive; no extraction tree yet
    let pkg_dir = data.join("mirror/abc123");
    fs::create_dir_all(&pkg_dir)?;
    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut writer = zip::ZipWriter::new(&mut cursor);
    writer.start_file("background.js", zip::write::SimpleFileOptions::default())?;
    std::io::Write::write_all(&mut writer, b"const k = 1;")?;
    writer.finish()?;
    fs::write(pkg_dir.join("pkg.zip"), cursor.into_inner())?;
    fs::write(data.join("mirror").join(MARKER), "warm\n")?;

    let scanner = write_fake_scanner(tmp.path());

    Command::cargo_bin("crxscan")?
        .args([
            "scan-filesystem",
            "--bucket",
            "unused-bucket",
            "--scanner-bin",
            scanner.to_str().unwrap(),
            "--data-dir",
            data.to_str().unwrap(),
        ])
        .env("ARGS_LOG", tmp.path().join("args.log"))
        .assert()
        .success()
        .stderr(contains("skipping download"));

    assert!(data.join("extracted/abc123/background.js").is_file());
    assert!(data.join("extracted").join(MARKER).is_file());
    Ok(())
}

#[test]
fn smoke_scan_filesystem_fails_when_the_scanner_is_missing() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let data = tmp.path().join("data");
    warm_data_dir(&data);

    Command::cargo_bin("crxscan")?
        .args([
            "scan-filesystem",
            "--bucket",
            "unused-bucket",
            "--scanner-bin",
            "/no/such/scanner-binary",
            "--data-dir",
            data.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("failed to launch scanner").and(contains("/no/such/scanner-binary")));
    Ok(())
}
