//! Generate-set command implementation
//!
//! Renders every entry of an image-set document.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use super::reporting::{
    generation_exit_code, generation_summary, print_generation_results, print_json,
    GenerationOutput,
};
use crate::image_set::{generate_set, ImageSetOptions};
use crate::registry::Registry;

/// Run the generate-set command
///
/// # Returns
/// Exit code: 0 if at least one entry was written, 1 otherwise
pub fn run(registry: &Registry, options: &ImageSetOptions, json: bool) -> Result<ExitCode> {
    if !json {
        println!(
            "{} {}",
            "Generating set:".cyan().bold(),
            options.config.display()
        );
    }

    let results = generate_set(registry, options)?;

    if json {
        print_json(&GenerationOutput::new(&results))?;
        Ok(generation_exit_code(&results))
    } else {
        print_generation_results(&results);
        Ok(generation_summary(&results, "images"))
    }
}
