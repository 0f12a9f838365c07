//! Logging initialization.
//!
//! The library only emits `tracing` events; binaries decide where they go.

use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{LogFormat, LoggingConfig};

/// Installs a stderr subscriber for `config`.
///
/// `RUST_LOG` replaces the configured filter entirely. Later calls are
/// ignored, so tests and embedding services may call it freely.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(io::stderr().is_terminal())
                    .with_writer(io::stderr),
            )
            .try_init(),
    };
}

/// Captionist events at `level`, everything else (prompt and terminal
/// crates) at warn.
fn default_directives(level: &str) -> String {
    format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_scope_level_to_this_crate() {
        assert_eq!(default_directives("debug"), "warn,captionist=debug");
        assert!(EnvFilter::try_new(default_directives("trace")).is_ok());
    }

    #[test]
    fn repeated_init_is_harmless() {
        init(&LoggingConfig::default());
        init(&LoggingConfig {
            format: LogFormat::Json,
            ..LoggingConfig::default()
        });
    }
}
