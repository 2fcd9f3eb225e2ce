//! webjson CLI - static site generator.
//!
//! `webjson <SOURCE_DIR> <OUTPUT_DIR>` renders every JSON page descriptor in
//! the source tree through its template and copies all other files.

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use commands::BuildArgs;
use error::CliError;
use output::Output;

/// webjson - render JSON page descriptors through HTML templates.
#[derive(Parser)]
#[command(
    name = "webjson",
    version,
    about,
    override_usage = "webjson [OPTIONS] <SOURCE_DIR> <OUTPUT_DIR>"
)]
struct Cli {
    #[command(flatten)]
    build: BuildArgs,
}

fn main() -> ExitCode {
    let output = Output::new();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            output.info(&usage());
            output.error(&format!("Error: {} ({})", CliError::InvalidArguments, err.kind()));
            return ExitCode::from(CliError::InvalidArguments.exit_code());
        }
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.build.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli.build, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if matches!(err, CliError::InvalidArguments) {
                output.info(&usage());
            }
            output.error(&format!("Error: {err}"));
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(args: &BuildArgs, output: &Output) -> Result<(), CliError> {
    let Some((source, output_dir)) = args.dirs()? else {
        output.info(&Cli::command().render_help().to_string());
        return Ok(());
    };
    args.execute(source, output_dir)
}

fn usage() -> String {
    Cli::command().render_usage().to_string()
}
