use tracing_subscriber::EnvFilter;

/// Default directives used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,orrery=debug,orrery_widgets=debug";

pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over
/// `filter`. Calling this more than once is harmless.
pub fn init_with_filter(filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}
