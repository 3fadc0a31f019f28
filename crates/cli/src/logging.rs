//! Logging bootstrap.
//!
//! Logs always go to stderr because stdout carries the protocol when
//! serving. The filter comes from `HYPRLS_LOG`, then `RUST_LOG`, then the
//! `--verbose` flag.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Fails when the log file cannot be
/// opened or a subscriber is already installed.
pub(crate) fn init(verbose: bool, log_file: Option<&Path>) -> io::Result<()> {
    let file = log_file.map(open_log).transpose()?;

    let stderr_layer = fmt::layer().with_writer(io::stderr);
    let file_layer = file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)
}

fn filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    ["HYPRLS_LOG", "RUST_LOG"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

fn open_log(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
