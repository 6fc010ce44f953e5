//! Tracing subscriber setup for suites built on this crate.

use tracing::Level;
use tracing_subscriber::fmt;

/// Install a stderr `fmt` subscriber at debug level when `verbose`, error
/// level otherwise.
///
/// An already installed global subscriber is left in place, which is common
/// when several test binaries share a harness.
pub fn init(verbose: bool) {
    let max_level = if verbose { Level::DEBUG } else { Level::ERROR };
    if let Err(err) = fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .try_init()
    {
        tracing::debug!("keeping existing tracing subscriber: {err}");
    }
}
