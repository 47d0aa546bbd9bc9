//! SMS gateway for operational alerts and deployment notifications.
//!
//! Inbound webhooks (Alertmanager-style alerts, ArgoCD-style deployment
//! notifications) are classified, synthesized into short messages, routed
//! to a configured receiver and fanned out to its mobile numbers through
//! an SMS provider.

pub mod bootstrap;
pub mod config;
pub mod directory;
pub mod event;
pub mod http;
pub mod routing;
pub mod sink;
pub mod telemetry;
pub mod transport;
