//! Cleanup command implementation
//!
//! Removes files that fail validation, or previews the removals.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;
use text2file_spec::CleanupReport;

use super::reporting::print_json;
use crate::cleanup::{self, CleanupOptions};
use crate::registry::Registry;

/// Run the cleanup command
///
/// # Returns
/// Exit code: 0 once the walk completes, even if some deletions failed
pub fn run(
    registry: &Registry,
    options: &CleanupOptions,
    verbose: bool,
    json: bool,
) -> Result<ExitCode> {
    let report = cleanup::run(registry, options)?;

    if json {
        print_json(&report)?;
    } else {
        print_report(&report, verbose);
    }
    Ok(ExitCode::SUCCESS)
}

/// One line per inspected file. Invalid files whose deletion failed are
/// reported under `FAIL` only.
fn removal_lines(report: &CleanupReport, verbose: bool) -> Vec<(&'static str, String)> {
    let verb = if report.dry_run { "WOULD REMOVE" } else { "REMOVED" };
    let mut lines = Vec::new();
    for result in &report.inspected {
        if !result.valid {
            if report.removed.contains(&result.path) {
                lines.push((
                    verb,
                    format!(
                        "{}: {}",
                        result.path.display(),
                        result.reason.as_deref().unwrap_or("invalid")
                    ),
                ));
            }
        } else if verbose {
            lines.push(("KEPT", result.path.display().to_string()));
        }
    }
    lines
}

fn print_report(report: &CleanupReport, verbose: bool) {
    for (label, text) in removal_lines(report, verbose) {
        let label = if label == "KEPT" {
            label.green().bold()
        } else {
            label.red().bold()
        };
        println!("  {}  {}", label, text);
    }
    if verbose {
        for path in &report.skipped {
            println!("  {}  {}", "SKIP".yellow().bold(), path.display());
        }
    }
    for failure in &report.failures {
        println!(
            "  {}  {}: {}",
            "FAIL".red().bold(),
            failure.path.display(),
            failure.message
        );
    }

    let action = if report.dry_run {
        "would be removed"
    } else {
        "removed"
    };
    let summary = format!(
        "{} inspected, {} {}, {} skipped, {} failures",
        report.inspected.len(),
        report.removed.len(),
        action,
        report.skipped.len(),
        report.failures.len()
    );
    if report.failures.is_empty() {
        println!("\n{}", summary.green().bold());
    } else {
        println!("\n{}", summary.yellow().bold());
    }
}
