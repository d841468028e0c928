//! Parsing of the scanner's plain-text report.
//!
//! The report is a sequence of finding blocks, each opened by a
//! `Found verified result` or `Found unverified result` line and followed
//! by `Field: value` lines until the next block.

use std::path::Path;

use anyhow::{Context, Result};

const VERIFIED_MARKER: &str = "Found verified result";
const UNVERIFIED_MARKER: &str = "Found unverified result";

/// One finding block from the report.
#[derive(Debug, Clone, Default)]
pub struct Finding {
    pub detector: String,
    pub decoder: String,
    pub raw: String,
    pub file: String,
    pub line: Option<u64>,
    pub verified: bool,
    /// Free-form fields in report order, kept for the unknown listing.
    pub extra: Vec<(String, String)>,
}

impl Finding {
    /// Detector type lowercased with spaces and dashes stripped, the form
    /// the endpoint table is keyed by.
    pub fn normalized_detector(&self) -> String {
        self.detector
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }

    /// Extension the finding came from, read off the reported file path:
    /// the component after an `extensions` or `extracted` directory.
    pub fn extension_id(&self) -> &str {
        let mut components = Path::new(&self.file)
            .components()
            .filter_map(|c| c.as_os_str().to_str());
        while let Some(component) = components.next() {
            if component == "extensions" || component == "extracted" {
                if let Some(id) = components.next() {
                    // The id must be a directory, not the leaf file itself
                    if components.next().is_some() {
                        return id;
                    }
                    return "unknown";
                }
            }
        }
        "unknown"
    }

    /// Variable name carrying the secret in the env file:
    /// `<extension id>_<normalized detector>`.
    pub fn variable_name(&self) -> String {
        format!("{}_{}", self.extension_id(), self.normalized_detector())
    }
}

/// Parse a report into finding blocks. Lines outside any block are ignored.
pub fn parse_report(text: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut current: Option<Finding> = None;

    for line in text.lines() {
        let line = line.trim_end();

        if line.contains(VERIFIED_MARKER) || line.contains(UNVERIFIED_MARKER) {
            if let Some(finding) = current.take() {
                if !finding.raw.is_empty() {
                    findings.push(finding);
                }
            }
            current = Some(Finding {
                // Match the full marker: "unverified" contains "verified"
                verified: line.contains(VERIFIED_MARKER),
                ..Finding::default()
            });
            continue;
        }

        let Some(finding) = current.as_mut() else { continue };
        let Some((key, value)) = split_field(line) else { continue };

        match key {
            "Detector Type" => finding.detector = value.to_owned(),
            "Decoder Type" => finding.decoder = value.to_owned(),
            "Raw result" => finding.raw = value.to_owned(),
            "File" => finding.file = value.to_owned(),
            "Line" => finding.line = value.parse().ok(),
            _ => finding.extra.push((key.to_owned(), value.to_owned())),
        }
    }

    if let Some(finding) = current {
        if !finding.raw.is_empty() {
            findings.push(finding);
        }
    }
    findings
}

/// Load and parse a report file.
pub fn load_report(path: &Path) -> Result<Vec<Finding>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    Ok(parse_report(&text))
}

/// Drop findings whose raw value was already seen; first occurrence wins.
pub fn dedup_by_raw(findings: Vec<Finding>) -> Vec<Finding> {
    let mut seen = std::collections::HashSet::new();
    findings.into_iter().filter(|f| seen.insert(f.raw.clone())).collect()
}

/// `Field: value` lines start at column zero; indented lines belong to the
/// scanner's own chatter and are skipped.
fn split_field(line: &str) -> Option<(&str, &str)> {
    if line.starts_with(' ') || line.starts_with('\t') {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}
