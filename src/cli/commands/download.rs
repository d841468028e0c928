use clap::Args;

use crate::{
    cli::commands::inputs::BucketArgs,
    download::{DEFAULT_FETCH_JOBS, DEFAULT_SAMPLE_COUNT},
};

/// `crxscan download` command and flags
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Maximum number of object keys to sample from the bucket
    #[arg(value_name = "COUNT", default_value_t = DEFAULT_SAMPLE_COUNT)]
    pub count: usize,

    #[command(flatten)]
    pub bucket: BucketArgs,

    /// Number of parallel object fetches
    #[arg(long = "jobs", short = 'j', default_value_t = DEFAULT_FETCH_JOBS)]
    pub jobs: usize,
}
