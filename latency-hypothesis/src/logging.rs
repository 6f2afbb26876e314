//! Tracing setup for the command-line tool.

use anyhow::{Context, Result};
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Build the stderr-style subscriber: `warn` by default, `debug` when verbose,
/// further narrowed by `RUST_LOG`.
pub fn subscriber<W>(verbose: bool, ansi: bool, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(writer)
        .with_ansi(ansi)
        .finish()
}

/// Install the global subscriber writing to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(verbose: bool, ansi: bool) -> Result<()> {
    tracing::subscriber::set_global_default(subscriber(verbose, ansi, std::io::stderr))
        .context("Failed to install tracing subscriber")
}
