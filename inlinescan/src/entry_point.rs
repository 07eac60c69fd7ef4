//! Shared entry point used by the binaries.

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::{run_analyze, run_similar, AnalyzeOptions};
use crate::config::Config;

/// Runs the scanner with the given arguments using stdout as the writer.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run the scanner with the given arguments, writing output to the specified
/// writer.
///
/// This is the testable version of [`run_with_args`] that allows output
/// capture.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["inlinescan".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                // Let clap print help/version as intended, but captured by redirect
                write!(writer, "{e}")?;
                writer.flush()?;
                return Ok(0);
            }
            _ => {
                eprint!("{e}");
                return Ok(1);
            }
        },
    };

    let file_config = cli
        .paths
        .first()
        .map_or_else(Config::load, |p| Config::load_from_path(p));
    let mut config = file_config.matcher_config();
    if let Some(v) = cli.min_size {
        config.min_function_size_in_blocks = v;
    }
    if let Some(v) = cli.min_head_size {
        config.min_function_head_size = v;
    }

    if let Some(command) = cli.command {
        match command {
            Commands::Similar {
                listing,
                nodes,
                json,
            } => {
                run_similar(&listing, &nodes, json, config, writer)?;
            }
        }
        return Ok(0);
    }

    let options = AnalyzeOptions {
        config,
        json: cli.json,
        report: cli.report,
        state_dir: cli.state_dir,
        quiet: cli.quiet,
    };
    run_analyze(&cli.paths, &options, writer)?;
    Ok(0)
}
