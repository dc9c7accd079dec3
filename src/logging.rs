use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use rpncalc::config::{Config, LOG_VAR};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Nothing is installed without a filter,
/// so the TUI screen is not overwritten by log lines.
pub fn init(config: &Config) -> Result<()> {
    let Some(directives) = &config.log_filter else {
        return Ok(());
    };

    let filter = EnvFilter::try_new(directives)
        .with_context(|| format!("invalid {} filter '{}'", LOG_VAR, directives))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| anyhow!("failed to install logger: {}", e))
}
