//! Alertmanager-style alert payloads.

use serde::Deserialize;
use std::collections::HashMap;

use super::ClassifyError;

/// An inbound alert batch as posted by Alertmanager or VictoriaMetrics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertBatch {
    /// Declared receiver name; also selects the message template
    #[serde(default)]
    pub receiver: String,

    /// Alerts in the batch; only the first is evaluated
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

/// One alert entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub labels: HashMap<String, String>,

    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

impl AlertBatch {
    /// Parse and validate an alert webhook body.
    ///
    /// Accepted only if the batch contains at least one alert and the first
    /// alert carries a non-empty `status` and a non-empty `severity` label.
    pub fn parse(body: &[u8]) -> Result<Self, ClassifyError> {
        let batch: AlertBatch = serde_json::from_slice(body)?;

        let Some(first) = batch.alerts.first() else {
            return Err(ClassifyError::EmptyAlerts);
        };
        if first.status.is_empty() {
            return Err(ClassifyError::MissingField("status"));
        }
        if first.label("severity").is_empty() {
            return Err(ClassifyError::MissingField("severity"));
        }

        Ok(batch)
    }

    /// First alert in the batch. Valid batches always have one.
    pub fn first(&self) -> Option<&Alert> {
        self.alerts.first()
    }
}

impl Alert {
    /// Label value, or `""` when absent.
    pub fn label(&self, name: &str) -> &str {
        self.labels.get(name).map(String::as_str).unwrap_or("")
    }

    /// Annotation value, or `""` when absent.
    pub fn annotation(&self, name: &str) -> &str {
        self.annotations.get(name).map(String::as_str).unwrap_or("")
    }
}

/// Whether an alert is actionable.
///
/// Fires on every resolution, and on firing alerts only when critical.
pub fn should_fire(status: &str, severity: &str) -> bool {
    status == "resolved" || (status == "firing" && severity == "critical")
}
