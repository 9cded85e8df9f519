//! # Self-diagnostics
//!
//! Enrichment never throws into the code that logs. Failures are reported as `tracing`
//! events on [`SELF_LOG_TARGET`] instead, and this module sets up a subscriber for them.

use crate::error::{EnrichError, EnrichResult};
use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Target of all enrichment failure reports
pub const SELF_LOG_TARGET: &str = "elif_enrich::selflog";

/// Output configuration for self-diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    /// Emit JSON lines instead of text
    pub json_format: bool,
    /// Multi-line pretty output for development
    pub pretty_print: bool,
    /// Environment filter (supports complex filters like "elif_enrich=debug,tower=info")
    pub env_filter: Option<String>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: false,
            pretty_print: false,
            env_filter: None,
        }
    }
}

impl DiagnosticsConfig {
    pub fn production() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: true,
            pretty_print: false,
            env_filter: Some(format!("{}=warn", SELF_LOG_TARGET)),
        }
    }

    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            pretty_print: true,
            env_filter: Some("elif_enrich=debug".to_string()),
        }
    }

    /// Errors only, plain text
    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            json_format: false,
            pretty_print: false,
            env_filter: Some("elif_enrich=error".to_string()),
        }
    }

    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn filter(&self) -> EnrichResult<EnvFilter> {
        let directives = self.env_filter.as_deref().unwrap_or(&self.level);
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(directives))
            .map_err(|e| EnrichError::diagnostics(e.to_string()))
    }
}

/// Install a global subscriber for self-diagnostics.
///
/// Fails instead of panicking when the process already has a global subscriber.
pub fn init_diagnostics(config: DiagnosticsConfig) -> EnrichResult<()> {
    let filter = config.filter()?;

    let result = if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stderr).json())
            .try_init()
    } else if config.pretty_print {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stderr).pretty())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stderr))
            .try_init()
    };
    result.map_err(|e| EnrichError::diagnostics(e.to_string()))?;

    tracing::debug!(
        target: SELF_LOG_TARGET,
        "Enrichment diagnostics initialized (level: {}, format: {})",
        config.level,
        if config.json_format { "JSON" } else { "text" }
    );

    Ok(())
}
