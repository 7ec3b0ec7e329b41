//! Command-line interface definition for weft.
//!
//! - `weft compose` - Print the composed bundler configuration
//! - `weft check` - Compose, then verify entry files and template exist

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use weft_config::Environment;

/// weft - compose bundler configuration from fragments
#[derive(Parser, Debug)]
#[command(
    name = "weft",
    version,
    about = "Compose bundler configuration for development or production builds",
    long_about = "weft resolves project paths once, runs its configuration fragment providers\n\
                  concurrently and merges their output into a single bundler configuration,\n\
                  written as JSON."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compose the configuration and write it as JSON
    Compose(ComposeArgs),

    /// Compose the configuration and validate it against the filesystem
    ///
    /// Fails when an entry file or the HTML template is missing.
    Check(CheckArgs),
}

/// Options shared by every command that composes a configuration.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Build mode
    #[arg(short, long, value_enum, default_value = "development")]
    pub mode: ModeArg,

    /// Directory to start the project root search from
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// JSON file with global definitions for the minifier
    ///
    /// Defaults to the framework compiler's ahead-of-time definitions.
    #[arg(long, value_name = "FILE")]
    pub global_defs: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ComposeArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Write the configuration to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit compact JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum ModeArg {
    #[value(name = "development", alias = "dev")]
    Development,

    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<ModeArg> for Environment {
    fn from(mode: ModeArg) -> Self {
        Environment {
            production: mode == ModeArg::Production,
        }
    }
}
