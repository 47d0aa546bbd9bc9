//! Append-only event sink.
//!
//! One line-oriented record per decision point: request received, message
//! built, receiver chosen, send result. The gateway does not depend on the
//! sink's durability; a failed append is logged and the request proceeds.

mod writer;

pub use writer::{FileEventSink, MemoryEventSink};

use async_trait::async_trait;
use thiserror::Error;

/// Sink errors.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepts line-oriented text records for audit and debugging.
#[async_trait]
pub trait EventSink: Send + Sync + std::fmt::Debug {
    /// Append one record. Appends are serialized; concurrent records never
    /// interleave within a line.
    async fn record(&self, line: &str) -> Result<(), SinkError>;

    /// Sink name for logging.
    fn name(&self) -> &str;
}
