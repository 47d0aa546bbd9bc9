//! ArgoCD-style deployment notification payloads.

use serde::Deserialize;
use std::collections::HashMap;

use super::ClassifyError;

/// An inbound deployment notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgocdNotification {
    /// Free-text message attached by the notifier
    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub app: ArgocdApp,

    /// Side-channel context, may carry a `receiver` override
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,

    #[serde(default, rename = "serviceType")]
    pub service_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgocdApp {
    #[serde(default)]
    pub metadata: ArgocdMetadata,

    #[serde(default)]
    pub spec: ArgocdSpec,

    #[serde(default)]
    pub status: ArgocdStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgocdMetadata {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgocdSpec {
    #[serde(default)]
    pub project: String,

    #[serde(default)]
    pub source: ArgocdSource,

    #[serde(default)]
    pub destination: ArgocdDest,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgocdSource {
    #[serde(default, rename = "repoURL")]
    pub repo_url: String,

    #[serde(default)]
    pub path: String,

    #[serde(default, rename = "targetRevision")]
    pub target_revision: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgocdDest {
    #[serde(default)]
    pub server: String,

    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgocdStatus {
    #[serde(default)]
    pub sync: ArgocdSync,

    #[serde(default)]
    pub health: ArgocdHealth,

    #[serde(default, rename = "operationState")]
    pub operation_state: ArgocdOperation,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgocdSync {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub revision: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgocdHealth {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgocdOperation {
    #[serde(default)]
    pub phase: String,

    #[serde(default)]
    pub message: String,
}

impl ArgocdNotification {
    /// Parse a deployment notification body.
    ///
    /// All fields are optional on the wire; only a payload that fails to
    /// parse into the notification shape is rejected.
    pub fn parse(body: &[u8]) -> Result<Self, ClassifyError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Receiver override carried in the notification context, if any.
    pub fn context_receiver(&self) -> Option<&str> {
        self.context
            .get("receiver")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}
