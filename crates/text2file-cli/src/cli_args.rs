//! CLI argument definitions for the text2file command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use text2file_spec::{ResizeMode, Rgb, DEFAULT_PREFIX};

/// text2file - generate, validate and clean up files from text
#[derive(Parser)]
#[command(name = "text2file")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Log filter (e.g. `info`, `text2file_cli=debug`); overrides TEXT2FILE_LOG
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Generate one file per extension from the same content
    Generate(GenerateArgs),

    /// Generate an image set described by a JSON document
    GenerateSet(GenerateSetArgs),

    /// Check files against the format their extension claims
    Validate {
        /// File or directory to validate
        path: PathBuf,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Also list valid files
        #[arg(short, long)]
        verbose: bool,

        /// Output a machine-readable JSON report
        #[arg(long)]
        json: bool,
    },

    /// Delete files that fail validation
    Cleanup {
        /// Directory to clean
        path: PathBuf,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Report what would be removed without deleting anything
        #[arg(long)]
        dry_run: bool,

        /// Also list files that were kept
        #[arg(short, long)]
        verbose: bool,

        /// Output a machine-readable JSON report
        #[arg(long)]
        json: bool,
    },

    /// List supported extensions and whether their backend is available
    List {
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Content to write; `-` reads standard input
    pub content: String,

    /// Target extensions (e.g. txt pdf png)
    #[arg(required = true, num_args = 1..)]
    pub extensions: Vec<String>,

    /// Output directory (created if missing)
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File name prefix
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Background color (#rgb, #rrggbb or a name)
    #[arg(long, default_value = "white")]
    pub bg: Rgb,

    /// Text color (#rgb, #rrggbb or a name)
    #[arg(long, default_value = "black")]
    pub fg: Rgb,

    /// Treat the first tabular row as data, not a header
    #[arg(long)]
    pub no_header: bool,

    /// Worksheet name for xlsx output
    #[arg(long, default_value = "Sheet1")]
    pub sheet_name: String,

    /// Member name inside archives
    #[arg(long, default_value = "content.txt")]
    pub member_name: String,

    /// Output a machine-readable JSON report
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub(crate) struct GenerateSetArgs {
    /// JSON document: {"icons": [{"src": "...", "sizes": "WxH"}]}
    pub config: PathBuf,

    /// Output directory entry paths are relative to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Base image to resize into every entry
    #[arg(short, long)]
    pub base: Option<PathBuf>,

    /// Background color (#rgb, #rrggbb or a name)
    #[arg(long, default_value = "white")]
    pub bg: Rgb,

    /// Placeholder caption (defaults to each entry's size)
    #[arg(short, long)]
    pub text: Option<String>,

    /// Caption color (#rgb, #rrggbb or a name)
    #[arg(long, default_value = "black")]
    pub fg: Rgb,

    /// How a base image is fitted: letterbox or stretch
    #[arg(long)]
    pub resize: Option<ResizeMode>,

    /// Output a machine-readable JSON report
    #[arg(long)]
    pub json: bool,
}
