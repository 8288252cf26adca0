//! Diagnostic tracing for the gate itself.
//!
//! Stdout carries the confirmation lines and belongs to the hook contract,
//! so everything here goes to stderr. Level comes from `COMMIT_GATE_LOG`,
//! then `RUST_LOG`, and defaults to `error` so a normal run adds nothing to
//! the test runner's own output.
//!
//! ```bash
//! COMMIT_GATE_LOG=commit_gate=debug git commit
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "COMMIT_GATE_LOG";

/// Install the global subscriber. Later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("error"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
