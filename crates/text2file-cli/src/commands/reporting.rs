//! Shared console output helpers.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;
use text2file_spec::GenerationResult;

/// Print a value as pretty JSON on stdout.
pub(super) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

/// One line per generated artifact.
pub(super) fn print_generation_results(results: &[GenerationResult]) {
    for result in results {
        if result.succeeded {
            println!(
                "  {}  {} {}",
                "OK".green().bold(),
                result.path.display(),
                format!("({} bytes)", result.bytes.unwrap_or(0)).dimmed()
            );
        } else {
            let message = result
                .error
                .as_ref()
                .map(|e| e.message.as_str())
                .unwrap_or("unknown error");
            println!(
                "  {}  {}: {}",
                "FAIL".red().bold(),
                result.path.display(),
                message
            );
        }
    }
}

/// Summary line plus exit code: failure only when nothing succeeded.
pub(super) fn generation_summary(results: &[GenerationResult], noun: &str) -> ExitCode {
    let succeeded = results.iter().filter(|r| r.succeeded).count();
    let failed = results.len() - succeeded;
    let line = format!("{} of {} {} generated", succeeded, results.len(), noun);
    if failed == 0 {
        println!("\n{}", line.green().bold());
    } else if succeeded > 0 {
        println!("\n{} ({} failed)", line.yellow().bold(), failed);
    } else {
        println!("\n{}", line.red().bold());
    }
    generation_exit_code(results)
}

pub(super) fn generation_exit_code(results: &[GenerationResult]) -> ExitCode {
    if results.iter().any(|r| r.succeeded) {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// JSON shape of a generation report.
#[derive(Serialize)]
pub(super) struct GenerationOutput<'a> {
    pub succeeded: usize,
    pub failed: usize,
    pub results: &'a [GenerationResult],
}

impl<'a> GenerationOutput<'a> {
    pub(super) fn new(results: &'a [GenerationResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.succeeded).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}
