// ────────────────────────────────────────────────────────────
// Global allocator setup
//   * Default  - mimalloc             (no feature flags)
//   * Debug    - jemalloc (`use-jemalloc` feature)
//   * Fallback - system allocator     (`system-alloc` feature)
// ────────────────────────────────────────────────────────────

// --- jemalloc (opt-in) ---
#[cfg(feature = "use-jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

// --- mimalloc (default) ---
#[cfg(all(not(feature = "use-jemalloc"), not(feature = "system-alloc")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// --- system allocator (explicit opt-out) ---
#[cfg(feature = "system-alloc")]
use std::alloc::System;
#[cfg(feature = "system-alloc")]
#[global_allocator]
static GLOBAL: System = System;

use anyhow::{bail, Context, Result};
use crxscan::{
    cli::{
        commands::{download::DownloadArgs, scan::ScanFilesystemArgs},
        global::Command,
        CommandLineArgs, GlobalArgs,
    },
    convert, download, extract,
    layout::Layout,
    scanner::{self, ScanOptions},
    trufflehog::Trufflehog,
    util::Counted,
};
use tokio::runtime::Builder;
use tracing::info;
use tracing_core::metadata::LevelFilter;
use tracing_subscriber::{
    self, fmt, prelude::__tracing_subscriber_SubscriberExt, registry, util::SubscriberInitExt,
};

fn main() -> anyhow::Result<()> {
    color_backtrace::install();
    // Parse command-line arguments
    let args = CommandLineArgs::parse_args();

    // Commands with a parallel fetch stage size the runtime to their fan-out;
    // everything else gets whatever the host offers.
    let num_threads = match args.command {
        Command::Download(DownloadArgs { jobs, .. })
        | Command::ScanFilesystem(ScanFilesystemArgs { jobs, .. }) => jobs.max(1),
        _ => std::thread::available_parallelism().map(usize::from).unwrap_or(1),
    };

    let runtime = Builder::new_multi_thread()
        .worker_threads(num_threads)
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

fn setup_logging(global_args: &GlobalArgs) {
    // Determine log level based on global verbosity
    let (level, all_targets) = if global_args.quiet {
        (LevelFilter::ERROR, false)
    } else {
        let level = match global_args.verbose {
            0 => LevelFilter::INFO,  // Default level if no `-v` is provided
            1 => LevelFilter::DEBUG, // `-v`
            2 => LevelFilter::TRACE, // `-vv`
            _ => LevelFilter::TRACE, // `-vvv` or more
        };
        let all_targets = global_args.verbose > 2; // Enable all targets for `-vvv` or more
        (level, all_targets)
    };
    let filter = if all_targets {
        tracing_subscriber::filter::Targets::new().with_default(LevelFilter::TRACE)
    } else {
        // Per-target filtering, only chatty for our own crate
        tracing_subscriber::filter::Targets::new()
            .with_default(LevelFilter::ERROR)
            .with_target("crxscan", level)
    };
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr) // Write logs to stderr
        .with_target(true)
        .with_ansi(false)
        .without_time();
    registry().with(fmt_layer).with(filter).init();
}

async fn async_main(args: CommandLineArgs) -> Result<()> {
    setup_logging(&args.global_args);
    let layout = Layout::new(&args.global_args.data_dir);

    match args.command {
        Command::Download(download_args) => {
            let summary = download::run(
                &download_args.bucket.to_config(),
                &layout,
                download_args.count,
                download_args.jobs,
                args.global_args.use_progress(),
            )
            .await?;
            info!(
                "Mirrored {} into {}",
                Counted::regular(summary.fetched, "object"),
                layout.mirror_dir().display()
            );
        }
        Command::Unzip(unzip_args) => {
            let root = unzip_args.root.unwrap_or_else(|| layout.mirror_dir());
            if !root.is_dir() {
                bail!(
                    "archive root {} does not exist; run `crxscan download` first \
                     or pass a directory to unpack",
                    root.display()
                );
            }
            let summary = extract::run(&root, &layout)?;
            info!(
                "Unpacked {} from {} into {}",
                Counted::regular(summary.members, "member"),
                Counted::regular(summary.archives, "archive"),
                layout.extraction_dir().display()
            );
        }
        Command::ScanBucket(scan_args) => {
            let scanner = Trufflehog::new(&scan_args.scanner.scanner_bin)
                .extra_args(scan_args.scanner.scanner_args.clone());
            let code = scanner::scan_bucket(&scan_args.bucket.to_config(), &scanner)?;
            std::process::exit(code);
        }
        Command::ScanFilesystem(scan_args) => {
            let scanner = Trufflehog::new(&scan_args.scanner.scanner_bin)
                .extra_args(scan_args.scanner.scanner_args.clone());
            let opts = ScanOptions {
                count: scan_args.count,
                jobs: scan_args.jobs,
                progress: args.global_args.use_progress(),
            };
            let code =
                scanner::scan_filesystem(&scan_args.bucket.to_config(), &layout, &scanner, &opts)
                    .await?;
            std::process::exit(code);
        }
        Command::Convert(convert_args) => {
            let summary = convert::run(&convert_args)?;
            info!(
                "Converted {} of {} unique findings; {} had no known endpoint",
                Counted::regular(summary.known, "finding"),
                summary.unique,
                summary.unknown
            );
        }
        Command::Clean(_) => {
            let removed = layout.clean()?;
            if removed.is_empty() {
                info!("Nothing to clean under {}", layout.data_dir().display());
            } else {
                for path in &removed {
                    info!("Removed {}", path.display());
                }
            }
        }
    }
    Ok(())
}
