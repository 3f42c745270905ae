//! Generate command implementation
//!
//! Writes one file per requested extension from a single content payload.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use text2file_spec::{GenerateOptions, GenerationRequest};

use super::reporting::{
    generation_exit_code, generation_summary, print_generation_results, print_json,
    GenerationOutput,
};
use crate::batch::generate_batch;
use crate::registry::Registry;

/// Arguments of the generate command after parsing.
#[derive(Debug, Clone)]
pub struct GenerateCommand {
    /// Literal content, or `-` for standard input.
    pub content: String,
    pub extensions: Vec<String>,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub options: GenerateOptions,
    pub json: bool,
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 if at least one file was generated, 1 otherwise
pub fn run(registry: &Registry, command: GenerateCommand) -> Result<ExitCode> {
    let content = if command.content == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read content from standard input")?;
        buffer
    } else {
        command.content
    };

    let request = GenerationRequest::new(content, command.extensions, command.output_dir)
        .with_prefix(command.prefix)
        .with_options(command.options);

    if !command.json {
        println!(
            "{} {} into {}",
            "Generating:".cyan().bold(),
            request.extensions.join(", "),
            request.output_dir.display()
        );
    }

    let results = generate_batch(registry, &request)?;

    if command.json {
        print_json(&GenerationOutput::new(&results))?;
        Ok(generation_exit_code(&results))
    } else {
        print_generation_results(&results);
        Ok(generation_summary(&results, "files"))
    }
}
