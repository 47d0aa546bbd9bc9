//! Per-request decision engine.
//!
//! Drives classify, fire rule, message synthesis, receiver resolution,
//! send-window gating and fan-out over an immutable directory snapshot.
//! The engine is stateless; one is built per request from the current
//! snapshot.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::directory::{is_open, Directory, ScheduleError};
use crate::event::{should_fire, AlertBatch, ArgocdNotification, ClassifyError};
use crate::sink::EventSink;
use crate::telemetry::counters;
use crate::transport::{SmsTransport, TransportError};

use super::message::{build_alert_message, build_argocd_message};
use super::resolver::{resolve_alert, resolve_argocd, ResolvedReceiver};

/// Final decision for one inbound event.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A message was synthesized and handed to the transport
    Processed {
        receiver: String,
        message: String,
        recipients: usize,
    },
    /// The event was valid but not actionable
    Ignored { reason: String },
}

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Malformed(#[from] ClassifyError),

    #[error("invalid schedule for receiver '{receiver}': {source}")]
    Schedule {
        receiver: String,
        source: ScheduleError,
    },

    /// Invariant violation: the unconditional fallback did not resolve.
    #[error("no receiver resolved for the event")]
    ResolutionExhausted,

    #[error("delivery failed: {0}")]
    Transport(#[from] TransportError),
}

/// Routing-and-synthesis engine for one request.
#[derive(Debug, Clone)]
pub struct Engine {
    directory: Arc<Directory>,
    transport: Arc<dyn SmsTransport>,
    sink: Arc<dyn EventSink>,
}

impl Engine {
    pub fn new(
        directory: Arc<Directory>,
        transport: Arc<dyn SmsTransport>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            directory,
            transport,
            sink,
        }
    }

    /// Handle an alert webhook body.
    pub async fn process_alert(&self, body: &[u8]) -> Result<Outcome, EngineError> {
        counters::alert_received();
        self.record(&format!("alert received ({} bytes)", body.len()))
            .await;

        let batch = match AlertBatch::parse(body) {
            Ok(batch) => batch,
            Err(err) => {
                counters::payload_rejected();
                self.record(&format!("alert rejected: {err}")).await;
                return Err(err.into());
            }
        };

        // Only the first alert in the batch is evaluated
        let Some(first) = batch.first() else {
            return Err(ClassifyError::EmptyAlerts.into());
        };

        if !should_fire(&first.status, first.label("severity")) {
            self.record("alert ignored by default rules").await;
            return self.ignored("alert ignored by default rules");
        }

        let message = build_alert_message(&batch.receiver, first);
        self.record(&format!("built message: {message}")).await;

        let receiver = resolve_alert(&self.directory, &batch.receiver);
        self.deliver(receiver, message).await
    }

    /// Handle a deployment notification body.
    pub async fn process_argocd(&self, body: &[u8]) -> Result<Outcome, EngineError> {
        counters::argocd_received();
        self.record(&format!("argocd notification received ({} bytes)", body.len()))
            .await;

        let notif = match ArgocdNotification::parse(body) {
            Ok(notif) => notif,
            Err(err) => {
                counters::payload_rejected();
                self.record(&format!("argocd notification rejected: {err}"))
                    .await;
                return Err(err.into());
            }
        };

        if let Some(routing) = self.directory.argocd() {
            if !routing.enabled {
                self.record("argocd notifications disabled").await;
                return self.ignored("argocd notifications disabled");
            }
        }

        let Some(message) = build_argocd_message(&notif) else {
            self.record("argocd notification ignored (no significant event)")
                .await;
            return self.ignored("no significant deployment event");
        };
        self.record(&format!("built argocd message: {message}")).await;

        let receiver = resolve_argocd(&self.directory, &notif)
            .ok_or(EngineError::ResolutionExhausted)?;
        self.deliver(receiver, message).await
    }

    /// Gate on the receiver's send window and fan the message out.
    async fn deliver(
        &self,
        receiver: ResolvedReceiver,
        message: String,
    ) -> Result<Outcome, EngineError> {
        self.record(&format!("target receiver: {}", receiver.name))
            .await;

        if let Some(schedule) = &receiver.schedule {
            let open = is_open(schedule).map_err(|source| {
                counters::message_failed();
                EngineError::Schedule {
                    receiver: receiver.name.clone(),
                    source,
                }
            })?;

            if !open {
                self.record(&format!(
                    "send window closed for receiver: {}",
                    receiver.name
                ))
                .await;
                return self.ignored(&format!(
                    "outside send window for receiver {}",
                    receiver.name
                ));
            }
        }

        match self.transport.send_many(&receiver.mobiles, &message).await {
            Ok(()) => {
                counters::message_sent();
                self.record(&format!(
                    "message sent to receiver: {} ({} numbers)",
                    receiver.name,
                    receiver.mobiles.len()
                ))
                .await;

                info!(
                    receiver = %receiver.name,
                    recipients = receiver.mobiles.len(),
                    "message delivered"
                );

                Ok(Outcome::Processed {
                    receiver: receiver.name,
                    message,
                    recipients: receiver.mobiles.len(),
                })
            }
            Err(err) => {
                counters::message_failed();
                self.record(&format!(
                    "send failed for receiver {}: {err}",
                    receiver.name
                ))
                .await;
                Err(err.into())
            }
        }
    }

    fn ignored(&self, reason: &str) -> Result<Outcome, EngineError> {
        counters::message_ignored();
        Ok(Outcome::Ignored {
            reason: reason.to_string(),
        })
    }

    async fn record(&self, line: &str) {
        if let Err(err) = self.sink.record(line).await {
            warn!(sink = self.sink.name(), error = %err, "failed to append event record");
        }
    }
}
