//! Structured logging configuration.

use crate::config::ObservabilitySettings;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor the config file sets one.
const DEFAULT_FILTER: &str = "info,tower_http=info";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, defaulting to [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl LoggingConfig {
    /// Builds logging configuration from settings with env overrides.
    ///
    /// `MUSLIM_API_LOG_FORMAT` overrides the configured format. `verbose`
    /// raises the default filter to `debug`.
    #[must_use]
    pub fn from_settings(settings: &ObservabilitySettings, verbose: bool) -> Self {
        let format = std::env::var("MUSLIM_API_LOG_FORMAT")
            .ok()
            .or_else(|| settings.log_format.clone())
            .map(|f| LogFormat::parse(&f))
            .unwrap_or_default();

        let default_filter = if verbose {
            "debug".to_string()
        } else {
            settings
                .log_filter
                .clone()
                .unwrap_or_else(|| DEFAULT_FILTER.to_string())
        };

        Self {
            format,
            default_filter,
        }
    }

    /// Returns the effective filter: `RUST_LOG` if set, otherwise the default.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_verbose_overrides_filter() {
        let settings = ObservabilitySettings {
            log_filter: Some("warn".to_string()),
            ..ObservabilitySettings::default()
        };
        assert_eq!(LoggingConfig::from_settings(&settings, true).default_filter, "debug");
        assert_eq!(LoggingConfig::from_settings(&settings, false).default_filter, "warn");
    }
}
