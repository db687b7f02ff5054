//! Telemetry module providing tracing subscriber initialization.
//!
//! Logs go to stderr so that stdout stays reserved for the audit report.
//!
//! # Usage
//!
//! ```no_run
//! use chunkaudit_core::telemetry;
//!
//! fn main() {
//!     // Set RUST_LOG=debug to see per-index detail
//!     telemetry::init_dev_subscriber_with_env_filter();
//!     tracing::info!("Application started");
//! }
//! ```

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Build the environment filter, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize a stderr subscriber that respects the `RUST_LOG` environment variable.
///
/// If `RUST_LOG` is not set, defaults to INFO level.
///
/// # Panics
/// Panics if a global subscriber has already been set.
pub fn init_dev_subscriber_with_env_filter() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[cfg(test)]
mod tests {
    use super::*;

    // set_global_default can only be called once per process, so only the
    // filter construction is exercised here.
    #[test]
    fn test_env_filter_builds() {
        let filter = env_filter();
        assert!(!filter.to_string().is_empty());
    }
}
