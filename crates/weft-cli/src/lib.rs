//! weft CLI - compose bundler configuration from the command line.
//!
//! - [`cli`] - Argument definitions
//! - [`commands`] - `compose` and `check`
//! - [`config`] - Project settings loading with environment overrides
//! - [`error`] - CLI errors and miette conversion
//! - [`logger`] - tracing setup

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;

pub use error::{CliError, Result};
