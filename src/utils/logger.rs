use crate::utils::error::{HookError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("cc_hook=debug,info")
        } else {
            EnvFilter::new("cc_hook=info")
        }
    })
}

fn already_initialized(e: impl std::fmt::Display) -> HookError {
    HookError::ConfigError {
        message: format!("logger already initialized: {}", e),
    }
}

/// Human-readable output on stderr; stdout stays free for hook responses.
pub fn init_cli_logger(verbose: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(already_initialized)
}

pub fn init_json_logger() -> Result<()> {
    tracing_subscriber::registry()
        .with(default_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init()
        .map_err(already_initialized)
}
