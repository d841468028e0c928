use std::{
    fs,
    io::{self, Cursor},
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use once_cell::sync::Lazy;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::{
    container,
    layout::{self, Layout},
};

/// Member types worth keeping for scanning: script, data, markup, style,
/// and documentation.
const MEMBER_ALLOWLIST: &[&str] = &["*.js", "*.json", "*.html", "*.htm", "*.css", "*.md"];

static ALLOWLIST: Lazy<GlobSet> = Lazy::new(|| {
    let mut builder = GlobSetBuilder::new();
    for pattern in MEMBER_ALLOWLIST {
        builder.add(Glob::new(pattern).expect("member allow-list pattern should compile"));
    }
    builder.build().expect("member allow-list globset should build")
});

#[derive(Debug)]
pub struct ExtractSummary {
    pub archives: usize,
    pub members: usize,
}

/// Unpack every extension archive under `root` into the extraction tree.
///
/// Each archive's output is namespaced by its immediate parent directory's
/// name; two archives sharing a parent name merge into one target directory,
/// last writer winning on member collisions. The extraction tree is
/// recreated from scratch, and any single failed archive aborts the run,
/// leaving the tree without its completion marker.
pub fn run(root: &Path, layout: &Layout) -> Result<ExtractSummary> {
    let out_root = layout.extraction_dir();
    layout::reset_dir(&out_root)
        .with_context(|| format!("Failed to reset {}", out_root.display()))?;

    let archives = discover_archives(root);
    info!("Found {} extension archives under {}", archives.len(), root.display());

    let mut members = 0;
    for archive in &archives {
        members += extract_archive(archive, &out_root)
            .with_context(|| format!("Failed to extract {}", archive.display()))?;
    }

    layout::mark_complete(&out_root, &format!("{} archives", archives.len()))
        .context("Failed to write extraction completion marker")?;

    Ok(ExtractSummary { archives: archives.len(), members })
}

/// Recursively find container files under `root`, in path order.
///
/// Symbolic links are never followed, so a symlinked archive is not
/// discovered through its link name.
fn discover_archives(root: &Path) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder.follow_links(false);
    builder.standard_filters(false);
    builder.sort_by_file_path(|a, b| a.cmp(b));

    let mut found = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("Skipping entry: {e}");
                continue;
            }
        };
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if is_file && container::is_container_path(entry.path()) {
            found.push(entry.into_path());
        }
    }
    found
}

fn extract_archive(archive: &Path, out_root: &Path) -> Result<usize> {
    let namespace = archive
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unsorted".to_owned());
    let target = out_root.join(&namespace);
    fs::create_dir_all(&target)
        .with_context(|| format!("Failed to create {}", target.display()))?;

    let data = fs::read(archive)?;
    let offset = container::zip_payload_offset(&data)?;
    let mut zip = ZipArchive::new(Cursor::new(&data[offset..]))
        .with_context(|| format!("No readable zip payload in {}", archive.display()))?;

    let mut extracted = 0;
    for i in 0..zip.len() {
        let mut member = zip.by_index(i)?;
        if !member.is_file() {
            continue;
        }
        let name = member.name().to_owned();
        if !ALLOWLIST.is_match(&name) {
            debug!("Skipping member {name} (not on the allow-list)");
            continue;
        }
        let rel = PathBuf::from(&name);
        if !is_safe_member_path(&rel) {
            warn!("Unsafe member path {name:?} in {}", archive.display());
            continue;
        }

        let dest = target.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut out = fs::File::create(&dest)
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        io::copy(&mut member, &mut out)
            .with_context(|| format!("Failed to write {}", dest.display()))?;
        extracted += 1;
    }

    debug!(
        "Extracted {extracted} members from {} into {}",
        archive.display(),
        target.display()
    );
    Ok(extracted)
}

/// A member name may only descend below the target directory.
fn is_safe_member_path(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
