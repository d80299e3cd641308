use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `STUDYPLAN_LOG` wins over the configured level.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_env("STUDYPLAN_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Tests and embedding callers may have installed one already.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
