use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::tempdir;

#[test]
fn cli_version_flag() {
    Command::cargo_bin("crxscan")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_help_lists_subcommands() {
    Command::cargo_bin("crxscan")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            contains("download")
                .and(contains("unzip"))
                .and(contains("scan-bucket"))
                .and(contains("scan-filesystem"))
                .and(contains("convert"))
                .and(contains("clean")),
        );
}

/// Unknown subcommand prints usage, exits non-zero, and leaves no artifacts.
#[test]
fn cli_unknown_subcommand_prints_usage_without_side_effects() {
    let dir = tempdir().unwrap();

    Command::cargo_bin("crxscan")
        .unwrap()
        .current_dir(dir.path())
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(contains("Usage"));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "unexpected artifacts: {leftovers:?}");
}

#[test]
fn download_requires_a_bucket() {
    Command::cargo_bin("crxscan")
        .unwrap()
        .arg("download")
        .assert()
        .failure()
        .stderr(contains("--bucket"));
}

#[test]
fn unzip_accepts_the_extract_alias() {
    let dir = tempdir().unwrap();

    // No mirror tree and no ROOT argument: a clear bail, not a crash
    Command::cargo_bin("crxscan")
        .unwrap()
        .current_dir(dir.path())
        .args(["extract"])
        .assert()
        .failure()
        .stderr(contains("run `crxscan download` first"));
}
