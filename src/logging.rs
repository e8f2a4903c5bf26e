use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_ENV: &str = "CSOPS_LOG";

/// Stderr-only subscriber; stdout carries reports.
pub fn init_tracing(config_filter: &str) -> Result<()> {
    let filter = resolve_filter(std::env::var(LOG_ENV).ok(), config_filter);
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("failed to parse logging filter '{}'", filter))?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .try_init()
        .context("failed to initialize tracing subscriber")?;
    Ok(())
}

fn resolve_filter(from_env: Option<String>, config_filter: &str) -> String {
    from_env
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| {
            let f = config_filter.trim();
            if f.is_empty() {
                crate::services::config::DEFAULT_LOG_FILTER.to_string()
            } else {
                f.to_string()
            }
        })
}
