//! Validate command implementation
//!
//! Checks a file, or every known file in a directory, against its claimed
//! format.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use text2file_spec::ValidationReport;

use super::reporting::print_json;
use crate::inspect::validate_tree;
use crate::registry::Registry;

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if every inspected file is valid and nothing faulted, 1 otherwise
pub fn run(
    registry: &Registry,
    path: &Path,
    recursive: bool,
    verbose: bool,
    json: bool,
) -> Result<ExitCode> {
    let report = validate_tree(registry, path, recursive)?;

    if json {
        print_json(&report)?;
    } else {
        print_report(&report, verbose);
    }

    Ok(if report.all_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_report(report: &ValidationReport, verbose: bool) {
    for result in &report.results {
        if result.valid {
            if verbose {
                println!(
                    "  {}  {} {}",
                    "VALID".green().bold(),
                    result.path.display(),
                    result.detail.as_deref().unwrap_or_default().dimmed()
                );
            }
        } else {
            println!(
                "  {}  {}: {}",
                "INVALID".red().bold(),
                result.path.display(),
                result.reason.as_deref().unwrap_or("unknown reason")
            );
        }
    }
    if verbose {
        for path in &report.skipped {
            println!("  {}  {}", "SKIP".yellow().bold(), path.display());
        }
    }
    for fault in &report.faults {
        println!(
            "  {}  {}: {}",
            "ERROR".red().bold(),
            fault.path.display(),
            fault.message
        );
    }

    let summary = format!(
        "{} valid, {} invalid, {} skipped, {} errors",
        report.valid_count(),
        report.invalid_count(),
        report.skipped.len(),
        report.faults.len()
    );
    if report.all_valid() {
        println!("\n{}", summary.green().bold());
    } else {
        println!("\n{}", summary.red().bold());
    }
}
