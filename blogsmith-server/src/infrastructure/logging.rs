use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_DIRECTIVES: &str = "info,blogsmith_server=debug";

/// Resolves the filter from `RUST_LOG`. A missing or unparseable value falls
/// back to the default directives; the second element carries the rejected
/// value so it can be reported once a subscriber exists.
fn resolve_filter(from_env: Option<String>) -> (EnvFilter, Option<String>) {
    match from_env.filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => match EnvFilter::try_new(&raw) {
            Ok(filter) => (filter, None),
            Err(_) => (EnvFilter::new(DEFAULT_DIRECTIVES), Some(raw)),
        },
        None => (EnvFilter::new(DEFAULT_DIRECTIVES), None),
    }
}

pub fn init_logging() {
    let (filter, rejected) = resolve_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok());

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .json()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);

    if let Some(raw) = rejected {
        warn!(rust_log = %raw, default = DEFAULT_DIRECTIVES, "ignoring invalid RUST_LOG");
    }
}
