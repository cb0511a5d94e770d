//! Tracing initialisation.

use crate::config::ObservabilityConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to the
/// catalog crates. Returns `false` if a subscriber was already installed.
///
/// ```rust,ignore
/// let config = CatalogConfig::from_env()?;
/// catalog::telemetry::init_tracing(&config.observability);
/// ```
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}

fn default_filter(config: &ObservabilityConfig) -> EnvFilter {
    let level = config.log_level.to_lowercase();
    EnvFilter::new(format!(
        "catalog={level},catalog_core={level},catalog_runtime={level}"
    ))
}
