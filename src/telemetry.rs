//! Telemetry initialization.
//!
//! Controlled by two environment variables:
//! - `PATCHVAULT_LOG` — an `EnvFilter` directive (default `"warn"`)
//! - `PATCHVAULT_LOG_FORMAT` — `"json"` switches to JSON output
//!
//! All output goes to stderr so patch text on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "PATCHVAULT_LOG";

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "PATCHVAULT_LOG_FORMAT";

/// Initialize the tracing subscriber. Call once from `main`.
pub fn init() {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
