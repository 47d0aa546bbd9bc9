use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::types::Config;

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        debug!(path = %path.display(), "loading configuration");

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        Self::from_json(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(json).context("failed to parse JSON configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    ///
    /// Only structural invariants are enforced here. Schedules are checked
    /// at decision time so a bad timezone surfaces on the request it would
    /// have gated, and mapping entries naming unknown receivers fall
    /// through to the next routing strategy by design.
    pub fn validate(&self) -> Result<()> {
        let mut receiver_names = std::collections::HashSet::new();
        for receiver in &self.receivers {
            if receiver.name.is_empty() {
                anyhow::bail!("receiver with empty name");
            }
            if !receiver_names.insert(&receiver.name) {
                anyhow::bail!("duplicate receiver name: {}", receiver.name);
            }
        }

        info!(receivers = self.receivers.len(), "configuration validated");
        Ok(())
    }
}
