//! Diagnostic logging for the binary.
//!
//! Logs go to stderr so stdout stays reserved for reports (and parseable
//! with `--json`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV: &str = "TEXT2FILE_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Pick the filter directive: explicit flag, then [`LOG_ENV`], then `warn`.
pub fn filter_directive(flag: Option<&str>, env: Option<&str>) -> String {
    flag.or(env)
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Install the global subscriber. Calling it twice is an error.
pub fn init(flag: Option<&str>) -> anyhow::Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(flag, env.as_deref());
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow::anyhow!("invalid log filter '{}': {}", directive, e))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install logger: {}", e))
}
