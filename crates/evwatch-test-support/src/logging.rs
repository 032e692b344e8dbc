//! Test logging: routes `tracing` output through the test harness.

use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber that writes through the test harness's
/// captured output. The filter comes from `RUST_LOG` and defaults to `warn`.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
