//! Logging initialization driven by the configured level

use crate::config::Config;

/// Installs a global `fmt` subscriber at the configured level
///
/// Returns `false` when a subscriber is already installed, leaving the
/// existing one untouched. Intended for binaries and examples; library
/// code only emits events and never calls this itself.
pub fn init(config: &Config) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_max_level(config.log_level.as_tracing_level())
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(log_level = %config.log_level, "Logging initialized");
    }
    installed
}
