//! Tracing subscriber initialization.
//!
//! # Usage
//!
//! ```no_run
//! use netops_observe::{LogFormat, init_tracing};
//!
//! // `-v` on the command line, human-readable output
//! init_tracing(1, false, LogFormat::Pretty).unwrap();
//! ```
//!
//! Logs always go to stderr so a document written to stdout stays clean.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Filter directive for a verbosity count. `RUST_LOG` overrides it.
pub fn default_directive(verbosity: u8, quiet: bool) -> &'static str {
    match verbosity {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,netops=debug",
        _ => "trace",
    }
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init_tracing(
    verbosity: u8,
    quiet: bool,
    format: LogFormat,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_directives() {
        assert_eq!(default_directive(0, true), "error");
        assert_eq!(default_directive(0, false), "warn");
        assert_eq!(default_directive(1, false), "info,netops=debug");
        assert_eq!(default_directive(3, true), "trace");
    }

    #[test]
    fn test_directives_parse() {
        for v in 0..3 {
            assert!(EnvFilter::try_new(default_directive(v, false)).is_ok());
        }
    }
}
