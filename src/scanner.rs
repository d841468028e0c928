//! Orchestration of the two scan modes.
//!
//! Bucket mode hands the remote bucket straight to the scanner. Filesystem
//! mode first makes sure the mirror and extraction trees exist, gated on
//! their completion markers, then scans the extracted tree.

use std::process::ExitStatus;

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    download, extract,
    layout::Layout,
    s3::BucketConfig,
    trufflehog::Trufflehog,
};

pub struct ScanOptions {
    pub count: usize,
    pub jobs: usize,
    pub progress: bool,
}

/// Scan the remote bucket in place. No local state is touched.
pub fn scan_bucket(config: &BucketConfig, scanner: &Trufflehog) -> Result<i32> {
    let status = scanner.scan_bucket(&config.bucket, config.profile.as_deref())?;
    Ok(exit_code(status))
}

/// Ensure the mirror and extraction trees are populated, then scan the
/// extracted tree, returning the scanner's exit code.
///
/// A stage whose completion marker is present is skipped, so a second run
/// against warm state goes straight to the scanner. Both stages are fatal
/// on failure; the scanner never runs against a tree that was not fully
/// unpacked.
pub async fn scan_filesystem(
    config: &BucketConfig,
    layout: &Layout,
    scanner: &Trufflehog,
    opts: &ScanOptions,
) -> Result<i32> {
    if layout.mirror_complete() {
        info!("Mirror tree already populated; skipping download");
    } else {
        download::run(config, layout, opts.count, opts.jobs, opts.progress)
            .await
            .context("Download stage failed")?;
    }

    if layout.extraction_complete() {
        info!("Extraction tree already populated; skipping unzip");
    } else {
        extract::run(&layout.mirror_dir(), layout).context("Extract stage failed")?;
    }

    let status = scanner.scan_filesystem(&layout.extraction_dir())?;
    Ok(exit_code(status))
}

/// Pass the scanner's exit code through; a signal death maps to failure.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
