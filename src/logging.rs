use std::io;

use time::macros::format_description;
use time::UtcOffset;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a stderr `tracing` subscriber.
///
/// # Arguments
/// * `no_color` - Disable ANSI colors
/// * `log_level` - Filter directive such as `"debug"` or `"descriptor_visitor=trace"`;
///   falls back to `RUST_LOG`, then to `"info"`
///
/// Only the first call installs a subscriber. Later calls, or calls made after
/// the host application installed its own, return `Ok` and change nothing. The
/// only error is an unparsable `log_level`.
pub fn init_logger(no_color: bool, log_level: Option<&str>) -> io::Result<()> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!("[[[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z]"),
    );

    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer)
        .with_ansi(!no_color)
        .with_filter(filter);

    // Installed without the `log` bridge: a `log` logger set by someone else
    // (test harnesses often set one) must not make this call fail.
    let subscriber = tracing_subscriber::registry().with(stderr_layer);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }
    Ok(())
}
