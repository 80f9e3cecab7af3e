//! Test logging, installed once per test binary.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceCell<()> = OnceCell::new();

// The stub backend's HTTP stack is noisy below warn.
const DEFAULT_FILTER: &str = "warn,hyper=off,mockito=off";

fn filter() -> EnvFilter {
    ["TEST_LOG", "RUST_LOG"]
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the test subscriber. Safe to call from every `ctor`; only the first
/// call does anything, and an already-installed global subscriber is kept.
///
/// `TEST_LOG` wins over `RUST_LOG`. `TEST_LOG_JSON=1` switches to the JSON
/// layout the server writes.
pub fn init() {
    INSTALLED.get_or_init(|| {
        let builder = fmt()
            .with_env_filter(filter())
            .with_test_writer()
            .without_time();
        if std::env::var_os("TEST_LOG_JSON").is_some() {
            builder.json().try_init().ok();
        } else {
            builder.try_init().ok();
        }
    });
}
