use std::path::PathBuf;

use clap::{Args, ValueHint};

use crate::s3::BucketConfig;

// -----------------------------------------------------------------------------
// Shared argument groups
// -----------------------------------------------------------------------------

/// Remote bucket selection, shared by every command that talks to S3.
#[derive(Args, Debug, Clone)]
#[command(next_help_heading = "Bucket Options")]
pub struct BucketArgs {
    /// Name of the S3 bucket holding the extension archives
    #[arg(long, value_name = "BUCKET")]
    pub bucket: String,

    /// Only consider object keys under this prefix
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Use the specified AWS named profile for credentials
    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<String>,
}

impl BucketArgs {
    pub fn to_config(&self) -> BucketConfig {
        BucketConfig {
            bucket: self.bucket.clone(),
            prefix: self.prefix.clone(),
            profile: self.profile.clone(),
        }
    }
}

/// How to invoke the external secret scanner.
#[derive(Args, Debug, Clone)]
#[command(next_help_heading = "Scanner Options")]
pub struct ScannerArgs {
    /// Secret scanner binary to invoke
    #[arg(
        long = "scanner-bin",
        value_name = "PATH",
        default_value = "trufflehog",
        value_hint = ValueHint::CommandName
    )]
    pub scanner_bin: PathBuf,

    /// Extra argument passed through to the scanner (repeatable)
    #[arg(long = "scanner-arg", value_name = "ARG")]
    pub scanner_args: Vec<String>,
}
