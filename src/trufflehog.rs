use std::{
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
};

use tracing::{debug, info};

/// Errors from driving the external secret scanner.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("failed to launch scanner {program}: {source}", program = .program.display())]
    Spawn { program: PathBuf, source: std::io::Error },
}

fn format_exit_status(status: &ExitStatus) -> String {
    status.code().map(|code| code.to_string()).unwrap_or_else(|| status.to_string())
}

/// A helper struct for running the secret scanner.
///
/// The scanner's stdout and stderr are inherited so its report and
/// diagnostics reach the user untouched; only process launch failures are
/// surfaced as our own errors.
pub struct Trufflehog {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl Trufflehog {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), extra_args: Vec::new() }
    }

    /// Append pass-through arguments to every invocation.
    pub fn extra_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.extra_args.extend(args);
        self
    }

    /// Scan the remote bucket in place.
    ///
    /// The scanner has no profile flag of its own, so the named profile is
    /// exported into the child's environment.
    pub fn scan_bucket(
        &self,
        bucket: &str,
        profile: Option<&str>,
    ) -> Result<ExitStatus, ScannerError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("s3").arg("--bucket").arg(bucket);
        if let Some(profile) = profile {
            cmd.env("AWS_PROFILE", profile);
        }
        self.run(cmd)
    }

    /// Scan a local directory tree.
    pub fn scan_filesystem(&self, dir: &Path) -> Result<ExitStatus, ScannerError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("filesystem").arg(dir);
        self.run(cmd)
    }

    fn run(&self, mut cmd: Command) -> Result<ExitStatus, ScannerError> {
        for arg in &self.extra_args {
            cmd.arg(arg);
        }
        cmd.stdin(Stdio::null());
        debug!("Running scanner: {cmd:?}");
        let status = cmd
            .status()
            .map_err(|source| ScannerError::Spawn { program: self.program.clone(), source })?;
        info!("Scanner exited with status {}", format_exit_status(&status));
        Ok(status)
    }
}
