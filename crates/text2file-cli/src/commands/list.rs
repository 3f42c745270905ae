//! List command implementation

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use super::reporting::print_json;
use crate::registry::Registry;

/// Run the list command
pub fn run(registry: &Registry, json: bool) -> Result<ExitCode> {
    let families = registry.families();
    if json {
        print_json(&families)?;
        return Ok(ExitCode::SUCCESS);
    }

    for listing in &families {
        println!("{}", listing.family.to_string().cyan().bold());
        for ext in &listing.extensions {
            let aliases = if ext.aliases.is_empty() {
                String::new()
            } else {
                format!(" (also {})", ext.aliases.join(", "))
            };
            match (ext.available, ext.requires) {
                (true, _) => println!("  {}{}", ext.extension.green(), aliases.dimmed()),
                (false, Some(dependency)) => println!(
                    "  {}{}  {}",
                    ext.extension.dimmed(),
                    aliases.dimmed(),
                    format!("unavailable: {}", dependency.install_hint()).yellow()
                ),
                (false, None) => println!("  {}{}", ext.extension.dimmed(), aliases.dimmed()),
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
