//! Shared helpers for the `unused-modules` test suites.
//!
//! - [`builders`]: plugin options and in-memory project trees.
//! - [`fake_host`]: a scripted `Compilation` that records what the detector
//!   asked of it.

pub mod builders;
pub mod fake_host;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single async test step. Forced inclusion has no
/// timeout of its own, so a host that never answers would hang the test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Defaults to `unused_modules=debug` so per-file scan and watch decisions
/// show up in the output of failing tests; override with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,unused_modules=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, panicking if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("build did not settle within {TEST_TIMEOUT:?}"),
    }
}
