use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Setup tracing + log integration
pub fn setup_logging() {
    LogTracer::init().expect("Failed to set LogTracer");
    let fmt_layer = fmt::layer().with_target(true);
    let filter = EnvFilter::from_default_env();
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}
