//! Logging setup.

use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

/// Subscriber that writes to stderr. `RUST_LOG` overrides `env_filter`.
pub fn get_subscriber(env_filter: String) -> impl Subscriber + Sync + Send {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_filter));
    let stderr = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_line_number(true)
        .with_target(true);
    Registry::default().with(env_filter).with(stderr)
}

/// Register a subscriber as global default and route `log` records
/// (reqwest's, for one) into it.
///
/// Returns `false` if a global subscriber was already set.
pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) -> bool {
    let _ = LogTracer::init();
    set_global_default(subscriber).is_ok()
}

/// Install [`get_subscriber`]. Safe to call more than once; only the first
/// call installs anything.
pub fn init_logging(default_filter: &str) {
    if init_subscriber(get_subscriber(default_filter.into())) {
        tracing::info!("Initialized logs");
    }
}
