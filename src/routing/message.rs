//! Message synthesis.
//!
//! Alert templates are keyed by the *declared receiver name* in the
//! payload, not by the alert content: two wire-identical alert bodies under
//! different declared receivers produce different wording. This is
//! deliberate and load-bearing for the legacy receivers.

use crate::event::{Alert, ArgocdNotification};

/// Receiver whose alerts use the legacy instance/consumer-group templates.
pub const LEGACY_ALERT_RECEIVER: &str = "alert-d1-lgc-devops";

/// Receiver whose alerts use the Kubernetes cluster/namespace/pod template.
pub const K8S_ALERT_RECEIVER: &str = "alert-devops";

/// Maximum length of free-text segments in deployment messages.
const SEGMENT_LIMIT: usize = 50;

/// Truncate `s` to at most `max` characters, ellipsizing the tail.
///
/// Counts characters rather than bytes so multi-byte input is never split
/// mid-character.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Synthesize the alert message for a declared receiver.
pub fn build_alert_message(receiver: &str, alert: &Alert) -> String {
    let status = &alert.status;
    let alertgroup = label_or(alert, "alertgroup", "unknown-alertgroup");
    let alertname = label_or(alert, "alertname", "unknown-alertname");

    let mut summary = alert.annotation("summary");
    if summary.is_empty() {
        summary = alert.label("alertname");
    }

    if receiver == LEGACY_ALERT_RECEIVER {
        if !alert.label("instance").is_empty() {
            let instance = alert.label("instance");
            format!("[{status}] AlertName: {alertname} | Instance: {instance} | Sum: {summary}")
        } else if !alert.label("topic").is_empty() || !alert.label("consumergroup").is_empty() {
            let consumergroup = label_or(alert, "consumergroup", "unknown-consumergroup");
            let job = label_or(alert, "job", "unknown-job");
            let topic = label_or(alert, "topic", "unknown-topic");
            format!(
                "[{status}] {alertname} | ConsumerGroup: {consumergroup} | Job: {job} | Topic: {topic} | Sum: {summary}"
            )
        } else {
            format!(
                "[{status}] Legacy alert type but missing fields | AlertGroup: {alertgroup} | AlertName: {alertname} | Sum: {summary}"
            )
        }
    } else if receiver == K8S_ALERT_RECEIVER {
        if !alert.label("cluster").is_empty()
            || !alert.label("namespace").is_empty()
            || !alert.label("pod").is_empty()
        {
            let cluster = label_or(alert, "cluster", "unknown-cluster");
            let namespace = label_or(alert, "namespace", "unknown-namespace");
            let pod = label_or(alert, "pod", "unknown-pod");
            format!("[{status}] {cluster}/{namespace} | {pod} | {summary}")
        } else {
            format!(
                "[{status}] K8S alert type but missing fields | AlertGroup: {alertgroup} | AlertName: {alertname} | Sum: {summary}"
            )
        }
    } else {
        format!("[{status}] AlertGroup: {alertgroup} | AlertName: {alertname} | Sum: {summary}")
    }
}

/// Synthesize the deployment message, or `None` when the sync status is not
/// alert-worthy.
pub fn build_argocd_message(notif: &ArgocdNotification) -> Option<String> {
    let app = &notif.app;
    let sync_status = &app.status.sync.status;

    let tag = match sync_status.as_str() {
        "OutOfSync" => "OUT OF SYNC",
        "Unknown" => "SYNC UNKNOWN",
        _ => return None,
    };

    let mut parts = vec![format!("[{tag}]"), format!("App: {}", app.metadata.name)];

    let project = &app.spec.project;
    if !project.is_empty() && project != "default" {
        parts.push(format!("Project: {project}"));
    }

    let namespace = &app.spec.destination.namespace;
    if !namespace.is_empty() {
        parts.push(format!("NS: {namespace}"));
    }

    if !sync_status.is_empty() {
        parts.push(format!("Sync: {sync_status}"));
    }

    let op_message = &app.status.operation_state.message;
    if !op_message.is_empty() {
        parts.push(format!("Msg: {}", truncate(op_message, SEGMENT_LIMIT)));
    }

    if !notif.message.is_empty() && notif.message != *op_message {
        parts.push(truncate(&notif.message, SEGMENT_LIMIT));
    }

    Some(parts.join(" | "))
}

fn label_or<'a>(alert: &'a Alert, name: &str, fallback: &'a str) -> &'a str {
    let value = alert.label(name);
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
