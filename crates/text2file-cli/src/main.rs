//! text2file CLI - generate, validate and clean up files from text
//!
//! This binary parses arguments, installs logging and hands each command to
//! the library crate.

mod cli_args;

use clap::Parser;
use cli_args::{Cli, Commands, GenerateArgs, GenerateSetArgs};
use std::process::ExitCode;
use text2file_cli::cleanup::CleanupOptions;
use text2file_cli::commands;
use text2file_cli::commands::generate::GenerateCommand;
use text2file_cli::image_set::ImageSetOptions;
use text2file_cli::{logging, Registry};
use text2file_spec::GenerateOptions;

fn generate_command(args: GenerateArgs) -> GenerateCommand {
    GenerateCommand {
        content: args.content,
        extensions: args.extensions,
        output_dir: args.output_dir,
        prefix: args.prefix,
        options: GenerateOptions {
            width: args.width,
            height: args.height,
            background: args.bg,
            foreground: args.fg,
            has_header: !args.no_header,
            sheet_name: args.sheet_name,
            member_name: args.member_name,
            ..Default::default()
        },
        json: args.json,
    }
}

fn image_set_options(args: &GenerateSetArgs) -> ImageSetOptions {
    ImageSetOptions {
        config: args.config.clone(),
        output_dir: args.output_dir.clone(),
        base_image: args.base.clone(),
        background: args.bg,
        foreground: args.fg,
        text: args.text.clone(),
        resize: args.resize,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_level.as_deref()) {
        eprintln!("{}: {}", colored::Colorize::red("error"), e);
        return ExitCode::from(1);
    }

    let registry = Registry::builtin();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(&registry, generate_command(args)),
        Commands::GenerateSet(args) => {
            commands::generate_set::run(&registry, &image_set_options(&args), args.json)
        }
        Commands::Validate {
            path,
            recursive,
            verbose,
            json,
        } => commands::validate::run(&registry, &path, recursive, verbose, json),
        Commands::Cleanup {
            path,
            recursive,
            dry_run,
            verbose,
            json,
        } => commands::cleanup::run(
            &registry,
            &CleanupOptions {
                root: path,
                recursive,
                dry_run,
                ..Default::default()
            },
            verbose,
            json,
        ),
        Commands::List { json } => commands::list::run(&registry, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use text2file_spec::{ResizeMode, Rgb};

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "text2file",
            "generate",
            "Hello",
            "txt",
            "PNG",
            "-o",
            "out",
            "--bg",
            "#000",
            "--width",
            "64",
            "--no-header",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                let command = generate_command(args);
                assert_eq!(command.content, "Hello");
                assert_eq!(command.extensions, vec!["txt", "PNG"]);
                assert_eq!(command.output_dir, PathBuf::from("out"));
                assert_eq!(command.prefix, "generated");
                assert_eq!(command.options.background, Rgb::BLACK);
                assert_eq!(command.options.width, Some(64));
                assert!(!command.options.has_header);
                assert!(!command.json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_generate_requires_an_extension() {
        assert!(Cli::try_parse_from(["text2file", "generate", "Hello"]).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_colors() {
        assert!(Cli::try_parse_from(["text2file", "generate", "x", "png", "--fg", "#12"]).is_err());
    }

    #[test]
    fn test_cli_parses_generate_set() {
        let cli = Cli::try_parse_from([
            "text2file",
            "generate-set",
            "icons.json",
            "-b",
            "logo.png",
            "--resize",
            "stretch",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::GenerateSet(args) => {
                let options = image_set_options(&args);
                assert_eq!(options.config, PathBuf::from("icons.json"));
                assert_eq!(options.base_image, Some(PathBuf::from("logo.png")));
                assert_eq!(options.resize, Some(ResizeMode::Stretch));
                assert_eq!(options.output_dir, PathBuf::from("."));
                assert!(args.json);
            }
            _ => panic!("expected generate-set command"),
        }
    }

    #[test]
    fn test_cli_parses_cleanup_with_global_log_level() {
        let cli = Cli::try_parse_from([
            "text2file",
            "cleanup",
            "dir",
            "-r",
            "--dry-run",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Cleanup {
                path,
                recursive,
                dry_run,
                verbose,
                json,
            } => {
                assert_eq!(path, PathBuf::from("dir"));
                assert!(recursive);
                assert!(dry_run);
                assert!(!verbose);
                assert!(!json);
            }
            _ => panic!("expected cleanup command"),
        }
    }

    #[test]
    fn test_cli_parses_validate_and_list() {
        let cli = Cli::try_parse_from(["text2file", "validate", "a.pdf", "-v", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Validate {
                verbose: true,
                json: true,
                recursive: false,
                ..
            }
        ));
        let cli = Cli::try_parse_from(["text2file", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List { json: false }));
    }
}
