//! HTTP SMS provider client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::TransportConfig;

use super::{SmsTransport, TransportError};

/// Provider request body.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
    text: &'a str,
}

/// SMS transport posting to an HTTP provider endpoint.
#[derive(Debug)]
pub struct HttpSmsTransport {
    client: Client,
    url: String,
    sender: Option<String>,
    token: Option<String>,
}

impl HttpSmsTransport {
    /// Build a transport from configuration.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        if config.url.is_empty() {
            return Err(TransportError::NotConfigured);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            sender: config.sender.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl SmsTransport for HttpSmsTransport {
    async fn send(&self, mobile: &str, text: &str) -> Result<(), TransportError> {
        let body = SendRequest {
            to: mobile,
            from: self.sender.as_deref(),
            text,
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(mobile = %mobile, status = %status, "provider rejected message");
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        debug!(mobile = %mobile, chars = text.chars().count(), "message accepted by provider");
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}
