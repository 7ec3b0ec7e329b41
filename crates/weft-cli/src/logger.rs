//! Logging setup for the weft CLI.
//!
//! Logs go to stderr so that `weft compose` can write JSON to stdout.
//!
//! - `--verbose`: debug level for weft crates
//! - `--quiet`: errors only
//! - `RUST_LOG`: custom filter when neither flag is given
//! - default: info level for weft crates

use std::io::IsTerminal;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "weft=debug,weft_config=debug,weft_cli=debug";
const QUIET_FILTER: &str = "weft=error,weft_config=error,weft_cli=error";
const DEFAULT_FILTER: &str = "weft=info,weft_config=info,weft_cli=info";

/// Initialize the tracing subscriber. Call once, before any logging occurs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize logger with a custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Colors follow the stderr terminal; `NO_COLOR` disables them, `FORCE_COLOR` forces them.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    std::io::stderr().is_terminal()
}
