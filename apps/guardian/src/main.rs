//! # Guardian CLI
//!
//! Entry point: parses arguments, sets up logging and dispatches to
//! [`guardian::cli`].

use clap::{Parser, Subcommand};
use guardian::cli::{cmd_check, cmd_eval, cmd_size, cmd_status, cmd_toggle};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "guardian", version, about = "Toggles, triggers and pyramid sizing")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a reading against an ad-hoc threshold
    Eval {
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
        #[arg(long, allow_negative_numbers = true)]
        threshold: f64,
        #[arg(long)]
        name: Option<String>,
    },

    /// Evaluate a reading against a named trigger from a profile
    Check {
        #[arg(long)]
        profile: PathBuf,
        #[arg(long)]
        trigger: String,
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
    },

    /// Report whether a toggle is enabled (unknown toggles are off)
    Toggle {
        #[arg(long)]
        profile: PathBuf,
        name: String,
    },

    /// Size the next pyramid layer
    Size {
        /// Layers already in place
        #[arg(long)]
        layers: u32,
        /// Base layer size in whole units
        #[arg(long)]
        base: u64,
        #[arg(long)]
        profile: Option<PathBuf>,
        #[arg(long)]
        max_layers: Option<u32>,
        /// Grow each layer by 25% of the base instead of keeping it constant
        #[arg(long)]
        aggressive: bool,
    },

    /// Summarise a profile
    Status {
        #[arg(long)]
        profile: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let json = cli.json;
    let result = match cli.command {
        Command::Eval {
            value,
            threshold,
            name,
        } => cmd_eval(name.as_deref(), value, threshold, json).map(|_| ()),
        Command::Check {
            profile,
            trigger,
            value,
        } => cmd_check(&profile, &trigger, value, json).map(|_| ()),
        Command::Toggle { profile, name } => cmd_toggle(&profile, &name, json).map(|_| ()),
        Command::Size {
            layers,
            base,
            profile,
            max_layers,
            aggressive,
        } => cmd_size(profile.as_deref(), layers, base, max_layers, aggressive, json).map(|_| ()),
        Command::Status { profile } => cmd_status(&profile, json).map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
