//! Prometheus counters.

use once_cell::sync::Lazy;
use prometheus::{register_int_counter, IntCounter};

static ALERTS_RECEIVED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "smsgwd_alerts_received_total",
        "Alert webhook payloads received"
    )
    .unwrap()
});

static ARGOCD_RECEIVED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "smsgwd_argocd_received_total",
        "Deployment notification payloads received"
    )
    .unwrap()
});

static MESSAGES_SENT: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("smsgwd_messages_sent_total", "Messages handed to the provider").unwrap()
});

static MESSAGES_IGNORED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "smsgwd_messages_ignored_total",
        "Events dropped as non-actionable or outside a send window"
    )
    .unwrap()
});

static MESSAGES_FAILED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("smsgwd_messages_failed_total", "Delivery attempts that failed").unwrap()
});

static PAYLOADS_REJECTED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("smsgwd_payloads_rejected_total", "Malformed payloads rejected").unwrap()
});

static CONFIG_RELOADS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("smsgwd_config_reloads_total", "Successful configuration reloads")
        .unwrap()
});

/// Counter increment facade.
pub mod counters {
    pub fn alert_received() {
        super::ALERTS_RECEIVED.inc();
    }

    pub fn argocd_received() {
        super::ARGOCD_RECEIVED.inc();
    }

    pub fn message_sent() {
        super::MESSAGES_SENT.inc();
    }

    pub fn message_ignored() {
        super::MESSAGES_IGNORED.inc();
    }

    pub fn message_failed() {
        super::MESSAGES_FAILED.inc();
    }

    pub fn payload_rejected() {
        super::PAYLOADS_REJECTED.inc();
    }

    pub fn config_reloaded() {
        super::CONFIG_RELOADS.inc();
    }
}
