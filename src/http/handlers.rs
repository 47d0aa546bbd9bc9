//! Webhook and admin handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::routing::{EngineError, Outcome};

use super::server::{AppState, ReloadResult};

/// Alert webhook handler.
///
/// POST /sms - Alertmanager/VictoriaMetrics alert batches
pub async fn sms_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> impl IntoResponse {
    let engine = state.engine().await;

    match engine.process_alert(&body).await {
        Ok(Outcome::Processed { .. }) => {
            state.inc_processed();
            (StatusCode::OK, "Alert processed".to_string())
        }
        Ok(Outcome::Ignored { reason }) => {
            state.inc_ignored();
            (StatusCode::OK, reason)
        }
        Err(EngineError::Malformed(_)) => {
            state.inc_rejected();
            (StatusCode::BAD_REQUEST, "invalid alert format".to_string())
        }
        Err(err) => {
            state.inc_failed();
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Deployment notification handler.
///
/// POST /argocd and /argocd/webhook
pub async fn argocd_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> impl IntoResponse {
    let engine = state.engine().await;

    match engine.process_argocd(&body).await {
        Ok(Outcome::Processed { .. }) => {
            state.inc_processed();
            (StatusCode::OK, "ArgoCD notification processed".to_string())
        }
        Ok(Outcome::Ignored { reason }) => {
            state.inc_ignored();
            (StatusCode::OK, reason)
        }
        Err(EngineError::Malformed(_)) => {
            state.inc_rejected();
            (
                StatusCode::BAD_REQUEST,
                "invalid ArgoCD notification format".to_string(),
            )
        }
        Err(err) => {
            state.inc_failed();
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check handler.
pub async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

/// Live handler (for Kubernetes).
pub async fn live_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Ready handler (for Kubernetes).
pub async fn ready_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Directory-wide mobile set response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobilesResponse {
    pub count: usize,
    pub mobiles: Vec<String>,
}

/// Mobiles handler.
///
/// GET /mobiles - every number that can ever receive a message
pub async fn mobiles_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let directory = state.directory().await;
    let mobiles = directory.all_mobiles();
    Json(MobilesResponse {
        count: mobiles.len(),
        mobiles,
    })
}

/// One configured receiver, summarized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverSummary {
    pub name: String,
    pub mobiles: usize,
    pub scheduled: bool,
}

/// Receivers response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiversResponse {
    pub receivers: Vec<ReceiverSummary>,
}

/// Receivers handler.
///
/// GET /receivers - configured receiver names with mobile counts
pub async fn receivers_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let directory = state.directory().await;
    let receivers = directory
        .receivers()
        .iter()
        .map(|r| ReceiverSummary {
            name: r.name.clone(),
            mobiles: r.mobiles.len(),
            scheduled: r.schedule.as_ref().is_some_and(|s| s.enabled),
        })
        .collect();
    Json(ReceiversResponse { receivers })
}

/// Stats response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub uptime_seconds: u64,
    pub processed: u64,
    pub ignored: u64,
    pub rejected: u64,
    pub failed: u64,
    pub reload_count: u64,
}

/// Stats handler.
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatsResponse {
        uptime_seconds: state.uptime().as_secs(),
        processed: state.processed(),
        ignored: state.ignored(),
        rejected: state.rejected(),
        failed: state.failed(),
        reload_count: state.reload_count(),
    })
}

/// Metrics handler (Prometheus format).
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let output = String::from_utf8(buffer).unwrap_or_default();
            (
                StatusCode::OK,
                [("content-type", "text/plain; charset=utf-8")],
                output,
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Error encoding metrics: {}", e),
        ),
    }
}

/// Config reload handler.
///
/// POST /config/reload - rebuild the directory snapshot from disk
pub async fn reload_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.reload_config().await {
        Ok(result) => (StatusCode::OK, Json(result)),
        Err(error) => {
            let result = ReloadResult {
                success: false,
                message: error,
                reload_count: state.reload_count(),
                receivers: 0,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(result))
        }
    }
}
