use clap::Args;

use crate::{
    cli::commands::inputs::{BucketArgs, ScannerArgs},
    download::{DEFAULT_FETCH_JOBS, DEFAULT_SAMPLE_COUNT},
};

/// `crxscan scan-bucket` command and flags
#[derive(Args, Debug, Clone)]
pub struct ScanBucketArgs {
    #[command(flatten)]
    pub bucket: BucketArgs,

    #[command(flatten)]
    pub scanner: ScannerArgs,
}

/// `crxscan scan-filesystem` command and flags.
///
/// The sample-size and fan-out flags only matter when the mirror tree is
/// missing and the download stage has to run.
#[derive(Args, Debug, Clone)]
pub struct ScanFilesystemArgs {
    #[command(flatten)]
    pub bucket: BucketArgs,

    /// Maximum number of object keys to sample if a download is needed
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_SAMPLE_COUNT)]
    pub count: usize,

    /// Number of parallel object fetches if a download is needed
    #[arg(long = "jobs", short = 'j', default_value_t = DEFAULT_FETCH_JOBS)]
    pub jobs: usize,

    #[command(flatten)]
    pub scanner: ScannerArgs,
}
