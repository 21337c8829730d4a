use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG` when set and parseable, else `default_directives`.
pub fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Install the JSON stdout subscriber. Later calls are ignored.
pub fn init_tracing(default_directives: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(default_directives))
        .with(fmt::layer().json().with_current_span(false))
        .try_init();
}
