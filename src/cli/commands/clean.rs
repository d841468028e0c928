use clap::Args;

/// `crxscan clean` command.
///
/// Everything it removes lives under the global `--data-dir`.
#[derive(Args, Debug, Clone, Default)]
pub struct CleanArgs {}
