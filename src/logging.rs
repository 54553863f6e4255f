//! Structured logging setup for the generator binary
//!
//! Logs are written to stderr so generated output on stdout is never mixed
//! with diagnostics.
//!
//! ## Environment Variables
//!
//! - `GRPC_AGENT_LOG` - filter directives (falls back to `RUST_LOG`, then the level)
//! - `GRPC_AGENT_LOG_FORMAT` - `pretty` (default) or `json`
//! - `GRPC_AGENT_LOG_INCLUDE_LOCATION` - `true` to add file:line

use anyhow::{Context, Result};
use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for machine consumption, pretty-print for terminals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default level when no filter variable is set: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Explicit filter directives (comma-separated)
    pub filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::parse(
                &env::var("GRPC_AGENT_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
            filter: env::var("GRPC_AGENT_LOG")
                .or_else(|_| env::var("RUST_LOG"))
                .ok(),
            include_location: env::var("GRPC_AGENT_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Raise the default level for `-v` / `-vv`.
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.log_level = match verbose {
            0 => self.log_level,
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        };
        self
    }

    fn env_filter(&self) -> EnvFilter {
        match self.filter.as_deref() {
            Some(directives) if !directives.trim().is_empty() => {
                EnvFilter::try_new(directives).unwrap_or_else(|e| {
                    eprintln!("Warning: Invalid log filter '{directives}': {e}");
                    EnvFilter::new(&self.log_level)
                })
            }
            _ => EnvFilter::new(&self.log_level),
        }
    }
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}
