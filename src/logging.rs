use tracing_subscriber::EnvFilter;

/// Overrides the log filter, e.g. `REVIEW_LENS_LOG=debug`.
pub const LOG_ENV: &str = "REVIEW_LENS_LOG";

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
