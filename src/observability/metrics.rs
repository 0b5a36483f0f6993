//! Prometheus metrics.

use crate::config::ObservabilitySettings;
use crate::{Error, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Metrics configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsConfig {
    /// Whether the Prometheus recorder is installed.
    pub enabled: bool,
}

impl MetricsConfig {
    /// Builds metrics configuration from settings with env overrides.
    ///
    /// `MUSLIM_API_METRICS_ENABLED` (`true`/`false`/`1`/`0`) wins over the file.
    #[must_use]
    pub fn from_settings(settings: &ObservabilitySettings) -> Self {
        let enabled = parse_bool_env("MUSLIM_API_METRICS_ENABLED")
            .or(settings.metrics_enabled)
            .unwrap_or(false);
        Self { enabled }
    }
}

fn parse_bool_env(key: &str) -> Option<bool> {
    std::env::var(key).ok().and_then(|v| parse_bool(&v))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Installs the global Prometheus recorder when enabled.
pub(super) fn install_prometheus(config: &MetricsConfig) -> Result<Option<PrometheusHandle>> {
    if !config.enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| Error::operation("install_prometheus", e))?;

    Ok(Some(handle))
}

/// Renders the current metrics snapshot in Prometheus text format.
#[must_use]
pub fn render_metrics(handle: &PrometheusHandle) -> String {
    handle.run_upkeep();
    handle.render()
}
