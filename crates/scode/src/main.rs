//! scode CLI - Shortcode engine.
//!
//! Provides commands for:
//! - `expand`: Expand shortcodes in a document
//! - `strip`: Remove shortcodes from a document
//! - `check`: Test whether a document uses a shortcode
//! - `attrs`: Show how an attribute span is tokenized
//! - `tags`: List the registered shortcodes

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AttrsArgs, CheckArgs, DocumentArgs, Pass, TagsArgs};
use output::Output;

/// scode - Shortcode engine.
#[derive(Parser)]
#[command(name = "scode", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand shortcodes in a document.
    Expand(DocumentArgs),
    /// Remove shortcodes from a document.
    Strip(DocumentArgs),
    /// Exit successfully if a document contains the given shortcode.
    Check(CheckArgs),
    /// Print the attributes parsed from a span as JSON.
    Attrs(AttrsArgs),
    /// List the shortcodes registered by the enabled providers.
    Tags(TagsArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Expand(args) | Self::Strip(args) => args.pipeline.verbose,
            Self::Check(args) => args.pipeline.verbose,
            Self::Tags(args) => args.pipeline.verbose,
            Self::Attrs(_) => false,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN.
    // Logs go to stderr, stdout carries the document.
    let filter = if cli.command.verbose() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Expand(args) => args.execute(Pass::Expand),
        Commands::Strip(args) => args.execute(Pass::Strip),
        Commands::Check(args) => args.execute(),
        Commands::Attrs(args) => args.execute(),
        Commands::Tags(args) => args.execute(),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
