use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use futures::{stream, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::{
    layout::{self, Layout},
    s3::{self, BucketConfig},
};

/// How many object keys a run samples when no count is given.
pub const DEFAULT_SAMPLE_COUNT: usize = 100;
/// Fixed fetch fan-out unless overridden with `--jobs`.
pub const DEFAULT_FETCH_JOBS: usize = 10;

#[derive(Debug)]
pub struct DownloadSummary {
    pub listed: usize,
    pub fetched: usize,
}

/// Sample up to `count` keys from the bucket, write the manifest, and fetch
/// every listed object into the mirror tree.
///
/// The manifest and mirror tree are recreated from scratch on every run.
/// Fetches run `jobs` at a time; the first failure aborts the run, leaving
/// the mirror tree without its completion marker.
pub async fn run(
    config: &BucketConfig,
    layout: &Layout,
    count: usize,
    jobs: usize,
    progress: bool,
) -> Result<DownloadSummary> {
    let client = s3::build_client(config).await;

    layout::reset_file(&layout.manifest())
        .with_context(|| format!("Failed to reset {}", layout.manifest().display()))?;
    let mirror = layout.mirror_dir();
    layout::reset_dir(&mirror)
        .with_context(|| format!("Failed to reset {}", mirror.display()))?;

    let keys = s3::list_keys(&client, config, count).await?;
    info!(
        "Listed {} of at most {} object keys from s3://{}",
        keys.len(),
        count,
        config.bucket
    );

    write_manifest(&layout.manifest(), &keys)
        .with_context(|| format!("Failed to write {}", layout.manifest().display()))?;

    let bar = if progress && !keys.is_empty() {
        let style = ProgressStyle::with_template("{msg} {bar} {percent:>3}% {pos}/{len}")
            .expect("progress bar style template should compile");
        ProgressBar::new(keys.len() as u64).with_style(style).with_message("Fetching objects")
    } else {
        ProgressBar::hidden()
    };

    stream::iter(keys.iter().map(|key| {
        let client = &client;
        let bar = &bar;
        let mirror = mirror.as_path();
        let bucket = config.bucket.as_str();
        async move {
            let dest = mirror.join(key_to_relative_path(key)?);
            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let bytes = s3::fetch_object(client, bucket, key).await?;
            tokio::fs::write(&dest, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", dest.display()))?;
            debug!("Fetched {key} ({} bytes)", bytes.len());
            bar.inc(1);
            Ok::<_, anyhow::Error>(())
        }
    }))
    .buffer_unordered(jobs.max(1))
    .try_collect::<Vec<()>>()
    .await?;
    bar.finish_and_clear();

    layout::mark_complete(&mirror, &format!("{} objects", keys.len()))
        .context("Failed to write mirror completion marker")?;

    Ok(DownloadSummary { listed: keys.len(), fetched: keys.len() })
}

/// Map an object key onto a relative path inside the mirror tree.
///
/// Keys are attacker-controlled names; anything that does not resolve to a
/// plain relative path is rejected rather than written outside the tree.
fn key_to_relative_path(key: &str) -> Result<PathBuf> {
    let rel = PathBuf::from(key);
    if rel.as_os_str().is_empty()
        || rel.components().any(|c| !matches!(c, Component::Normal(_)))
    {
        bail!("object key {key:?} does not map to a safe relative path");
    }
    Ok(rel)
}

fn write_manifest(path: &Path, keys: &[String]) -> std::io::Result<()> {
    let mut contents = keys.join("\n");
    if !keys.is_empty() {
        contents.push('\n');
    }
    fs::write(path, contents)
}

/// Read a manifest back as a key list, one per line.
pub fn read_manifest(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    Ok(text.lines().filter(|l| !l.is_empty()).map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn safe_keys_map_to_relative_paths() {
        let rel = key_to_relative_path("extensions/abc123/pkg.crx").unwrap();
        assert_eq!(rel, PathBuf::from("extensions/abc123/pkg.crx"));
    }

    #[test]
    fn traversal_keys_are_rejected() {
        for key in ["../escape.crx", "a/../../b.crx", "/abs/path.crx", ""] {
            assert!(key_to_relative_path(key).is_err(), "key {key:?} should be rejected");
        }
    }

    #[test]
    fn manifest_round_trips_one_key_per_line() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("manifest.txt");

        let keys =
            vec!["extensions/a/pkg.crx".to_string(), "extensions/b/pkg.crx".to_string()];
        write_manifest(&path, &keys)?;
        assert_eq!(read_manifest(&path)?, keys);

        // An empty sample produces an empty manifest
        write_manifest(&path, &[])?;
        assert!(read_manifest(&path)?.is_empty());
        Ok(())
    }
}
