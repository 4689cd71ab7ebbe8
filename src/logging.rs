//! Tracing setup for embedding hosts.
//!
//! The library only emits `tracing` events; a subscriber is installed on
//! request from the JS side so diagnostics end up on the host's stderr.

#[cfg(feature = "napi")]
use napi_derive::napi;
use tracing_subscriber::{fmt, EnvFilter};

/// Env var consulted when no explicit filter is given
pub const LOG_ENV: &str = "VUE_JSX_NATIVE_LOG";

/// Install a global fmt subscriber. Returns false if one was already set.
pub fn init_tracing(filter: Option<&str>) -> bool {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(feature = "napi")]
#[napi]
pub fn init_tracing_native(filter: Option<String>) -> bool {
    init_tracing(filter.as_deref())
}
