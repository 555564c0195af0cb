use clap::Args;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::{self, Write as _};
use std::path::Path;

use stylefix::dedupe::IndentRule;
use stylefix::defaults;
use stylefix::{FixOptions, FixReport};

use super::CmdResult;

#[derive(Args, Debug, Default)]
pub struct FixArgs {
    /// File to fix (default: defaults.target from stylefix.json, else app/components/BusBookingSystem.tsx)
    pub path: Option<String>,

    /// Report duplicates without writing the file
    #[arg(long)]
    pub dry_run: bool,

    /// Like --dry-run, but exit 1 when duplicates exist
    #[arg(long)]
    pub check: bool,

    /// Print a JSON envelope instead of the text summary
    #[arg(long)]
    pub json: bool,

    /// Only count indented lines as key declarations
    #[arg(long)]
    pub require_indent: bool,

    /// Path to a stylefix.json config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FixOutput {
    pub command: &'static str,
    #[serde(flatten)]
    pub report: FixReport,
}

pub fn run(args: FixArgs, _global: &super::GlobalArgs) -> CmdResult<FixOutput> {
    let config = defaults::load_config(args.config.as_deref().map(Path::new))?;

    let target = match args.path {
        Some(path) if path.trim().is_empty() => {
            return Err(stylefix::Error::validation_invalid_argument(
                "path",
                "Target path must not be empty",
                None,
                None,
            ));
        }
        Some(path) => path,
        None => config.defaults.target.clone(),
    };
    let target = shellexpand::tilde(&target).to_string();

    let options = FixOptions {
        indent: IndentRule::from_flag(args.require_indent || config.defaults.require_indent),
        dry_run: args.dry_run || args.check,
        atomic_write: config.defaults.atomic_write,
    };

    // Text mode shows the summary before writing, so a failed write still
    // reports what was found.
    let report = if args.json {
        fix_with_summary(Path::new(&target), &options, &mut io::sink())?
    } else {
        fix_with_summary(Path::new(&target), &options, &mut io::stdout())?
    };

    let exit_code = if args.check && report.result.has_duplicates() {
        1
    } else {
        0
    };

    Ok((
        FixOutput {
            command: "fix",
            report,
        },
        exit_code,
    ))
}

/// Plan the fix, write the summary to `out`, then apply it.
fn fix_with_summary(
    path: &Path,
    options: &FixOptions,
    out: &mut dyn io::Write,
) -> stylefix::Result<FixReport> {
    let mut report = stylefix::plan_fix(path, options)?;

    if let Err(e) = out.write_all(render_summary(&report).as_bytes()) {
        if e.kind() != io::ErrorKind::BrokenPipe {
            return Err(stylefix::Error::internal_io(
                e.to_string(),
                Some("write stdout".to_string()),
            ));
        }
    }

    stylefix::apply_fix(&mut report, options)?;
    Ok(report)
}

/// Duplicate counts, printed before the file is written.
pub fn render_summary(report: &FixReport) -> String {
    let mut text = String::new();

    let _ = writeln!(
        text,
        "Found {} duplicate style names:",
        report.result.duplicates.len()
    );
    for duplicate in &report.result.duplicates {
        let _ = writeln!(
            text,
            "  {}: {} occurrences",
            duplicate.name, duplicate.occurrences
        );
    }

    text
}

/// Final line printed once the run has finished.
pub fn render_outcome(output: &FixOutput) -> String {
    let report = &output.report;
    if report.dry_run {
        format!("Dry run: no changes written to {}\n", report.path)
    } else {
        format!("Fixed duplicates in {}\n", report.path)
    }
}

/// Collision warnings, one line each, for stderr.
pub fn render_warnings(output: &FixOutput) -> Vec<String> {
    output
        .report
        .result
        .warnings
        .iter()
        .map(|w| format!("Warning: {}", w.message))
        .collect()
}
