//! Immutable receiver directory snapshot.
//!
//! Built once from loaded configuration and treated as read-only for the
//! process lifetime. A reload constructs a whole new snapshot and swaps the
//! `Arc` holding it; nothing here is mutated in place.

mod mobiles;
mod schedule;

pub use mobiles::{parse_mobiles, unique_mobiles};
pub use schedule::{is_open, is_open_at, ScheduleError};

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config::{ArgocdConfig, Config, Schedule};

/// A named delivery target with its normalized number list.
#[derive(Debug, Clone)]
pub struct Receiver {
    /// Receiver name (unique key)
    pub name: String,
    /// Ordered-unique mobile numbers
    pub mobiles: Vec<String>,
    /// Optional send window
    pub schedule: Option<Schedule>,
    /// Match labels
    pub match_labels: HashMap<String, String>,
}

/// The catch-all delivery target.
#[derive(Debug, Clone, Default)]
pub struct DefaultReceiver {
    /// Ordered-unique mobile numbers
    pub mobiles: Vec<String>,
    /// Optional send window
    pub schedule: Option<Schedule>,
}

/// Routing tables for deployment notifications, normalized for lookup.
#[derive(Debug, Clone, Default)]
pub struct ArgocdRouting {
    /// Accept deployment notifications
    pub enabled: bool,
    /// Exact application-name mapping
    pub app_exact: HashMap<String, String>,
    /// (prefix, receiver) pairs in declaration order
    pub app_prefix: Vec<(String, String)>,
    /// Project mapping, keys lowercased
    pub project: HashMap<String, String>,
    /// (namespace substring, receiver) pairs in declaration order
    pub namespace: Vec<(String, String)>,
    /// Receiver used when no mapping matches
    pub default_receiver: Option<String>,
}

/// Process-wide snapshot of receivers and routing tables.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    receivers: Vec<Receiver>,
    default_receiver: DefaultReceiver,
    argocd: Option<ArgocdRouting>,
}

impl Directory {
    /// Build a snapshot from loaded configuration.
    ///
    /// Raw mobile strings are parsed and deduplicated here, once; project
    /// mapping keys are lowercased for case-insensitive lookup. Mapping
    /// entries naming unknown receivers are kept (they fall through at
    /// resolution time) but logged.
    pub fn from_config(config: &Config) -> Self {
        let receivers: Vec<Receiver> = config
            .receivers
            .iter()
            .map(|r| Receiver {
                name: r.name.clone(),
                mobiles: unique_mobiles(parse_mobiles(&r.mobile)),
                schedule: r.schedule.clone(),
                match_labels: r.match_labels.clone(),
            })
            .collect();

        let default_receiver = DefaultReceiver {
            mobiles: unique_mobiles(parse_mobiles(&config.default_receiver.mobile)),
            schedule: config.default_receiver.schedule.clone(),
        };

        let argocd = config.argocd.as_ref().map(build_argocd_routing);

        let directory = Self {
            receivers,
            default_receiver,
            argocd,
        };

        for name in directory.unknown_mapping_targets() {
            warn!(receiver = %name, "routing table references unknown receiver");
        }

        debug!(
            receivers = directory.receivers.len(),
            default_mobiles = directory.default_receiver.mobiles.len(),
            argocd = directory.argocd.is_some(),
            "directory snapshot built"
        );

        directory
    }

    /// Look up a receiver by name.
    pub fn receiver(&self, name: &str) -> Option<&Receiver> {
        self.receivers.iter().find(|r| r.name == name)
    }

    /// All configured receivers, in declaration order.
    pub fn receivers(&self) -> &[Receiver] {
        &self.receivers
    }

    /// The catch-all receiver.
    pub fn default_receiver(&self) -> &DefaultReceiver {
        &self.default_receiver
    }

    /// Deployment routing tables, if configured.
    pub fn argocd(&self) -> Option<&ArgocdRouting> {
        self.argocd.as_ref()
    }

    /// Every number that can ever receive a message: the union over all
    /// receivers plus the default receiver, deduplicated, first-seen order.
    pub fn all_mobiles(&self) -> Vec<String> {
        let numbers = self
            .receivers
            .iter()
            .flat_map(|r| r.mobiles.iter().cloned())
            .chain(self.default_receiver.mobiles.iter().cloned());
        unique_mobiles(numbers)
    }

    fn unknown_mapping_targets(&self) -> Vec<String> {
        let Some(argocd) = &self.argocd else {
            return Vec::new();
        };

        let mut unknown = Vec::new();
        let names = argocd
            .app_exact
            .values()
            .chain(argocd.app_prefix.iter().map(|(_, r)| r))
            .chain(argocd.project.values())
            .chain(argocd.namespace.iter().map(|(_, r)| r))
            .chain(argocd.default_receiver.iter());

        for name in names {
            if self.receiver(name).is_none() && !unknown.contains(name) {
                unknown.push(name.clone());
            }
        }
        unknown
    }
}

fn build_argocd_routing(config: &ArgocdConfig) -> ArgocdRouting {
    ArgocdRouting {
        enabled: config.enabled,
        app_exact: config.app_mapping.clone(),
        app_prefix: config
            .app_prefix_mapping
            .iter()
            .map(|m| (m.prefix.clone(), m.receiver.clone()))
            .collect(),
        project: config
            .project_mapping
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect(),
        namespace: config
            .namespace_mapping
            .iter()
            .map(|m| (m.contains.clone(), m.receiver.clone()))
            .collect(),
        default_receiver: config.default_receiver.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> Config {
        Config::from_json(json).unwrap()
    }

    #[test]
    fn test_mobiles_normalized_per_receiver() {
        let directory = Directory::from_config(&config(
            r#"
{
  "receiver": [
    {"name": "a", "mobile": " +1 , +2, +1 ,"}
  ],
  "default_receiver": {"mobile": "+3"}
}
"#,
        ));

        let receiver = directory.receiver("a").unwrap();
        assert_eq!(receiver.mobiles, vec!["+1", "+2"]);
    }

    #[test]
    fn test_all_mobiles_deduplicated_across_receivers_and_default() {
        let directory = Directory::from_config(&config(
            r#"
{
  "receiver": [
    {"name": "a", "mobile": "+1,+2"},
    {"name": "b", "mobile": "+2,+3"}
  ],
  "default_receiver": {"mobile": "+3,+4"}
}
"#,
        ));

        assert_eq!(directory.all_mobiles(), vec!["+1", "+2", "+3", "+4"]);
    }

    #[test]
    fn test_project_keys_lowercased() {
        let directory = Directory::from_config(&config(
            r#"
{
  "receiver": [{"name": "a", "mobile": "+1"}],
  "default_receiver": {"mobile": ""},
  "argocd": {"project_mapping": {"Core-Banking": "a"}}
}
"#,
        ));

        let argocd = directory.argocd().unwrap();
        assert_eq!(argocd.project.get("core-banking").map(String::as_str), Some("a"));
        assert!(argocd.project.get("Core-Banking").is_none());
    }

    #[test]
    fn test_unknown_receiver_lookup() {
        let directory = Directory::from_config(&config(
            r#"
{
  "receiver": [{"name": "a", "mobile": "+1"}],
  "default_receiver": {"mobile": ""}
}
"#,
        ));

        assert!(directory.receiver("a").is_some());
        assert!(directory.receiver("missing").is_none());
    }
}
