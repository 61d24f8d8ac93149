use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::metrics::METRICS_SERVER_PORT;

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MetricsConfig {
    /// Enable the Prometheus endpoint
    #[serde(default)]
    pub enabled: bool,

    /// Metrics server port
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    METRICS_SERVER_PORT
}
