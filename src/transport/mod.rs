//! Outbound SMS transport.
//!
//! Delivery is a single best-effort call per request; there is no retry
//! loop here. A failed attempt is surfaced to the caller immediately.

mod http_client;
mod mock;

pub use http_client::HttpSmsTransport;
pub use mock::MockSmsTransport;

use async_trait::async_trait;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("provider request failed: {0}")]
    Request(String),

    #[error("provider returned status {status}")]
    Status { status: u16 },

    #[error("{failed} of {total} numbers failed")]
    Partial { failed: usize, total: usize },

    #[error("no provider URL configured")]
    NotConfigured,
}

/// Sends short text messages to mobile numbers.
#[async_trait]
pub trait SmsTransport: Send + Sync + std::fmt::Debug {
    /// Send one message to one number.
    async fn send(&self, mobile: &str, text: &str) -> Result<(), TransportError>;

    /// Send one message to every number in the list.
    ///
    /// Attempts every number even when some fail; any failure is reported
    /// as a single error for the call.
    async fn send_many(&self, mobiles: &[String], text: &str) -> Result<(), TransportError> {
        let mut failed = 0;
        for mobile in mobiles {
            if self.send(mobile, text).await.is_err() {
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(TransportError::Partial {
                failed,
                total: mobiles.len(),
            });
        }
        Ok(())
    }

    /// Transport name for logging.
    fn name(&self) -> &str;
}
