use std::path::PathBuf;

use clap::{Args, ValueHint};

/// `crxscan unzip` command and flags
#[derive(Args, Debug, Clone)]
pub struct UnzipArgs {
    /// Directory to search for extension archives (defaults to the mirror tree)
    #[arg(value_name = "ROOT", value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,
}
