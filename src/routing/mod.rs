//! Routing and synthesis.
//!
//! ```text
//! webhook body
//!      │
//!   classify ──► fire rule ──► build message ──► resolve receiver
//!                                                      │
//!                          transport ◄── fan-out ◄── schedule gate
//! ```

mod engine;
mod message;
mod resolver;

pub use engine::{Engine, EngineError, Outcome};
pub use message::{
    build_alert_message, build_argocd_message, truncate, K8S_ALERT_RECEIVER,
    LEGACY_ALERT_RECEIVER,
};
pub use resolver::{resolve_alert, resolve_argocd, ResolvedReceiver};
