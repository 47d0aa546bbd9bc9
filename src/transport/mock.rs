//! Mock SMS transport for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{SmsTransport, TransportError};

/// Records every send instead of delivering it; can be armed to fail.
#[derive(Debug, Default)]
pub struct MockSmsTransport {
    sent: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl MockSmsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    /// All (mobile, text) pairs sent so far.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of sends so far.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl SmsTransport for MockSmsTransport {
    async fn send(&self, mobile: &str, text: &str) -> Result<(), TransportError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(TransportError::Request("mock failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((mobile.to_string(), text.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
