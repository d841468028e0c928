use std::path::PathBuf;

use clap::{Args, ValueHint};

/// `crxscan convert` command and flags
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Scanner report to convert (trufflehog plain-text output)
    #[arg(value_name = "REPORT", default_value = "scan.txt", value_hint = ValueHint::FilePath)]
    pub report: PathBuf,

    /// Where to write the templated HTTP requests
    #[arg(long = "http-out", value_name = "FILE", default_value = "converted.http")]
    pub http_out: PathBuf,

    /// Where to write the variable-to-secret environment file
    #[arg(long = "env-out", value_name = "FILE", default_value = "http-client.env.json")]
    pub env_out: PathBuf,

    /// Where to list findings with no known verification endpoint
    #[arg(long = "unknown-out", value_name = "FILE", default_value = "unknown.txt")]
    pub unknown_out: PathBuf,

    /// Directory tree for per-extension response captures
    #[arg(
        long = "responses-dir",
        value_name = "DIR",
        default_value = "responses",
        value_hint = ValueHint::DirPath
    )]
    pub responses_dir: PathBuf,
}
