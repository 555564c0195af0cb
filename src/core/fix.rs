//! Fix duplicate style names in a single file.
//!
//! Reads the whole file, renames duplicated key declarations, and writes the
//! result back in place. Nothing is written when reading or renaming fails,
//! or when the content would not change.

use serde::Serialize;
use std::path::Path;

use crate::dedupe::{self, DedupeResult, IndentRule};
use crate::error::Result;
use crate::utils::io;

/// How a fix run behaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixOptions {
    pub indent: IndentRule,
    /// Compute renames without touching the file.
    pub dry_run: bool,
    /// Write through `<file>.tmp` and rename.
    pub atomic_write: bool,
}

/// Result of fixing one file.
#[derive(Debug, Clone, Serialize)]
pub struct FixReport {
    pub path: String,
    #[serde(flatten)]
    pub result: DedupeResult,
    pub dry_run: bool,
    /// Whether the rewritten buffer differs from the file.
    #[serde(skip)]
    pub changed: bool,
    /// Whether the file was rewritten.
    pub applied: bool,
}

/// Read the file at `path` and compute its renames without writing.
pub fn plan_fix(path: &Path, options: &FixOptions) -> Result<FixReport> {
    let display = path.display().to_string();

    log_status!("fix", "Scanning {}", display);
    let content = io::read_file(path, &format!("read {}", display))
        .map_err(|e| e.with_hint("Check that the target file exists and is readable"))?;

    let result = dedupe::dedupe_keys(&content, options.indent)?;
    log_status!(
        "fix",
        "{} declarations, {} duplicated names, {} renames",
        result.total_declarations,
        result.duplicates.len(),
        result.renames.len()
    );

    Ok(FixReport {
        path: display,
        changed: result.new_content != content,
        result,
        dry_run: options.dry_run,
        applied: false,
    })
}

/// Write a planned report back to disk.
///
/// Dry runs and unchanged buffers are left alone.
pub fn apply_fix(report: &mut FixReport, options: &FixOptions) -> Result<()> {
    if report.dry_run || !report.changed {
        return Ok(());
    }

    write_back(
        Path::new(&report.path),
        &report.result.new_content,
        options.atomic_write,
        &report.path,
    )?;
    log_status!("fix", "Wrote {}", report.path);
    report.applied = true;
    Ok(())
}

/// Rename duplicated style keys in the file at `path`.
pub fn fix_file(path: &Path, options: &FixOptions) -> Result<FixReport> {
    let mut report = plan_fix(path, options)?;
    apply_fix(&mut report, options)?;
    Ok(report)
}

fn write_back(path: &Path, content: &str, atomic: bool, display: &str) -> Result<()> {
    let operation = format!("write {}", display);
    if atomic {
        io::write_file_atomic(path, content, &operation)
    } else {
        io::write_file(path, content, &operation)
    }
}
