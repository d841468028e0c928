use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

/// File name of the sampled-key manifest inside the data directory.
pub const MANIFEST_FILE: &str = "manifest.txt";
/// Directory name of the local object mirror inside the data directory.
pub const MIRROR_DIR: &str = "mirror";
/// Directory name of the unpacked-archive tree inside the data directory.
pub const EXTRACTION_DIR: &str = "extracted";

/// Marker file written inside a stage's output tree once the stage finishes.
///
/// Its absence distinguishes an interrupted run from a completed one, so a
/// partially-populated tree is redone rather than trusted.
pub const COMPLETE_MARKER: &str = ".crxscan-complete";

/// Where the disposable on-disk artifacts live for one data directory.
#[derive(Debug, Clone)]
pub struct Layout {
    data_dir: PathBuf,
}

impl Layout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn manifest(&self) -> PathBuf {
        self.data_dir.join(MANIFEST_FILE)
    }

    pub fn mirror_dir(&self) -> PathBuf {
        self.data_dir.join(MIRROR_DIR)
    }

    pub fn extraction_dir(&self) -> PathBuf {
        self.data_dir.join(EXTRACTION_DIR)
    }

    /// True once a download run has finished populating the mirror tree.
    pub fn mirror_complete(&self) -> bool {
        is_complete(&self.mirror_dir())
    }

    /// True once an unzip run has finished populating the extraction tree.
    pub fn extraction_complete(&self) -> bool {
        is_complete(&self.extraction_dir())
    }

    /// Remove the manifest, mirror tree, and extraction tree if present.
    ///
    /// Unconditional; a second invocation finds nothing and removes nothing.
    pub fn clean(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();

        let manifest = self.manifest();
        if remove_file_if_present(&manifest)
            .with_context(|| format!("Failed to remove {}", manifest.display()))?
        {
            removed.push(manifest);
        }
        for dir in [self.mirror_dir(), self.extraction_dir()] {
            if remove_dir_if_present(&dir)
                .with_context(|| format!("Failed to remove {}", dir.display()))?
            {
                removed.push(dir);
            }
        }
        Ok(removed)
    }
}

/// Delete and recreate `dir`, leaving it empty.
pub(crate) fn reset_dir(dir: &Path) -> io::Result<()> {
    remove_dir_if_present(dir)?;
    fs::create_dir_all(dir)
}

/// Delete `path` if it exists, creating its parent directory either way so a
/// fresh file can be written there.
pub(crate) fn reset_file(path: &Path) -> io::Result<()> {
    remove_file_if_present(path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub(crate) fn mark_complete(dir: &Path, detail: &str) -> io::Result<()> {
    let marker = dir.join(COMPLETE_MARKER);
    debug!("Writing completion marker {}", marker.display());
    fs::write(marker, format!("{detail}\n"))
}

pub(crate) fn is_complete(dir: &Path) -> bool {
    dir.join(COMPLETE_MARKER).is_file()
}

fn remove_file_if_present(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn remove_dir_if_present(dir: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn markers_distinguish_interrupted_from_complete() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let layout = Layout::new(tmp.path().join("data"));

        // A bare directory is not completion
        fs::create_dir_all(layout.mirror_dir())?;
        assert!(!layout.mirror_complete());

        mark_complete(&layout.mirror_dir(), "3 objects")?;
        assert!(layout.mirror_complete());

        // Resetting the tree clears the marker with it
        reset_dir(&layout.mirror_dir())?;
        assert!(!layout.mirror_complete());
        Ok(())
    }

    #[test]
    fn clean_removes_all_artifacts_and_is_idempotent() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let layout = Layout::new(tmp.path().join("data"));

        fs::create_dir_all(layout.mirror_dir().join("ext/a"))?;
        fs::write(layout.mirror_dir().join("ext/a/pkg.crx"), b"x")?;
        fs::create_dir_all(layout.extraction_dir())?;
        fs::write(layout.manifest(), "ext/a/pkg.crx\n")?;

        let removed = layout.clean()?;
        assert_eq!(removed.len(), 3);
        assert!(!layout.manifest().exists());
        assert!(!layout.mirror_dir().exists());
        assert!(!layout.extraction_dir().exists());

        // Second run finds nothing and succeeds
        assert!(layout.clean()?.is_empty());
        Ok(())
    }

    #[test]
    fn reset_file_creates_parent_for_fresh_manifest() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let layout = Layout::new(tmp.path().join("nested/data"));
        reset_file(&layout.manifest())?;
        assert!(layout.data_dir().is_dir());
        assert!(!layout.manifest().exists());
        Ok(())
    }
}
