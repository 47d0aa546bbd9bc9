//! Inbound payload classification.
//!
//! Each webhook body is parsed into exactly one notification variant and
//! validated. Classification is pure; rejection maps to an HTTP 400 at the
//! handler layer.

mod alert;
mod argocd;

pub use alert::{should_fire, Alert, AlertBatch};
pub use argocd::{
    ArgocdApp, ArgocdDest, ArgocdHealth, ArgocdMetadata, ArgocdNotification, ArgocdOperation,
    ArgocdSource, ArgocdSpec, ArgocdStatus, ArgocdSync,
};

use thiserror::Error;

/// Payload classification errors.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload contains no alerts")]
    EmptyAlerts,

    #[error("first alert is missing required field '{0}'")]
    MissingField(&'static str),
}
