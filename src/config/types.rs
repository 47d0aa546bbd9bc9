use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for smsgwd
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Named delivery targets
    #[serde(default, alias = "receiver")]
    pub receivers: Vec<ReceiverConfig>,

    /// Catch-all delivery target used when no named receiver resolves
    #[serde(default)]
    pub default_receiver: DefaultReceiverConfig,

    /// Routing tables for deployment notifications
    pub argocd: Option<ArgocdConfig>,

    /// HTTP listener configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Outbound SMS provider configuration
    #[serde(default)]
    pub transport: TransportConfig,

    /// Event sink configuration
    #[serde(default)]
    pub sink: SinkConfig,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

/// A named receiver loaded from configuration.
///
/// `mobile` is the raw comma-separated number list as written in the config
/// file; it is normalized into an ordered-unique list when the directory
/// snapshot is built.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiverConfig {
    /// Receiver name (unique key)
    pub name: String,

    /// Comma-separated mobile numbers
    #[serde(default)]
    pub mobile: String,

    /// Optional send window
    pub schedule: Option<Schedule>,

    /// Optional match labels
    #[serde(default, rename = "match")]
    pub match_labels: HashMap<String, String>,
}

/// The catch-all receiver (same shape as a receiver, minus name and match)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultReceiverConfig {
    /// Comma-separated mobile numbers
    #[serde(default)]
    pub mobile: String,

    /// Optional send window
    pub schedule: Option<Schedule>,
}

/// A daily send window bound to a timezone.
///
/// Start and end are `HH:MM:SS` time-of-day strings interpreted in
/// `timezone`. The window is inclusive at both ends.
#[derive(Debug, Clone, Deserialize)]
pub struct Schedule {
    /// Gate delivery on this window
    #[serde(default)]
    pub enabled: bool,

    /// Window start, `HH:MM:SS`
    #[serde(default)]
    pub start_time: String,

    /// Window end, `HH:MM:SS`
    #[serde(default)]
    pub end_time: String,

    /// IANA timezone identifier
    #[serde(default)]
    pub timezone: String,

    /// How to interpret a window whose end precedes its start
    #[serde(default)]
    pub overnight: OvernightPolicy,
}

/// Interpretation of a window whose `end_time` precedes its `start_time`.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OvernightPolicy {
    /// Both bounds fall on the same day; an inverted window is empty
    #[default]
    SameDay,
    /// The window spans midnight into the next day
    Wrap,
}

/// Routing tables for deployment notifications.
///
/// Prefix and namespace mappings are ordered lists evaluated in declaration
/// order; the first entry whose pattern matches and whose receiver exists
/// wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgocdConfig {
    /// Accept deployment notifications
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Exact application-name mapping
    #[serde(default)]
    pub app_mapping: HashMap<String, String>,

    /// Application-name prefix mapping, in declaration order
    #[serde(default)]
    pub app_prefix_mapping: Vec<PrefixMapping>,

    /// Project mapping, matched case-insensitively
    #[serde(default)]
    pub project_mapping: HashMap<String, String>,

    /// Namespace substring mapping, in declaration order
    #[serde(default)]
    pub namespace_mapping: Vec<NamespaceMapping>,

    /// Receiver used when no mapping matches
    pub default_receiver: Option<String>,
}

/// One (prefix, receiver) routing entry
#[derive(Debug, Clone, Deserialize)]
pub struct PrefixMapping {
    /// Application-name prefix
    pub prefix: String,

    /// Target receiver name
    pub receiver: String,
}

/// One (namespace substring, receiver) routing entry
#[derive(Debug, Clone, Deserialize)]
pub struct NamespaceMapping {
    /// Substring matched against the destination namespace
    pub contains: String,

    /// Target receiver name
    pub receiver: String,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Bind address
    #[serde(default = "default_http_address")]
    pub address: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: default_http_address(),
        }
    }
}

fn default_http_address() -> SocketAddr {
    "0.0.0.0:8080".parse().unwrap()
}

/// Outbound SMS provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Provider endpoint URL
    #[serde(default)]
    pub url: String,

    /// Sender id passed to the provider
    pub sender: Option<String>,

    /// Bearer token for the provider API
    pub token: Option<String>,

    /// Request timeout
    #[serde(default = "default_transport_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            sender: None,
            token: None,
            timeout: default_transport_timeout(),
        }
    }
}

fn default_transport_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Event sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Path of the append-only event log
    #[serde(default = "default_sink_path")]
    pub path: PathBuf,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            path: default_sink_path(),
        }
    }
}

fn default_sink_path() -> PathBuf {
    PathBuf::from("smsgwd_events.log")
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable structured JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

/// Humantime serde support module
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
