//! Tracing Setup
//!
//! Installs a console `tracing` subscriber writing to stderr, keeping stdout
//! free for the result document.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives (default: `forecast_engine=info`)
//! - `FORECAST_ENV`: set to `development` for colored output without targets
//!
//! # Usage
//!
//! ```rust,ignore
//! use forecast_engine::telemetry::init_tracing;
//!
//! fn main() -> anyhow::Result<()> {
//!     init_tracing()?;
//!     // ... application code
//!     Ok(())
//! }
//! ```

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "forecast_engine=info";

/// Build the filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    let is_development = std::env::var("FORECAST_ENV")
        .map(|v| v == "development")
        .unwrap_or(false);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(!is_development)
        .with_ansi(is_development);

    Registry::default()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(development = is_development, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(DEFAULT_FILTER.parse::<tracing_subscriber::filter::Directive>().is_ok());
        let _ = env_filter();
    }

    #[test]
    fn test_second_init_fails() {
        // Either this call or an earlier one in the same process installs it
        let _ = init_tracing();
        assert!(init_tracing().is_err());
    }
}
