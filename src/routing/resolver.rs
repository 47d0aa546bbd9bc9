//! Receiver resolution.
//!
//! Alerts resolve by the declared receiver name with the global default as
//! fallback. Deployment notifications walk an ordered strategy chain; the
//! first strategy that names a *configured* receiver wins, and a strategy
//! whose named receiver is not configured falls through to the next one.

use tracing::{debug, trace};

use crate::config::Schedule;
use crate::directory::Directory;
use crate::event::ArgocdNotification;

use super::message::K8S_ALERT_RECEIVER;

/// Name of the synthetic receiver built from the global default.
const DEFAULT_RECEIVER_NAME: &str = "default";

/// A resolved delivery target, by value, possibly synthetic.
#[derive(Debug, Clone)]
pub struct ResolvedReceiver {
    /// Receiver name, or `"default"` for the synthetic fallback
    pub name: String,
    /// Ordered-unique mobile numbers
    pub mobiles: Vec<String>,
    /// Optional send window
    pub schedule: Option<Schedule>,
}

impl ResolvedReceiver {
    fn configured(directory: &Directory, name: &str) -> Option<Self> {
        directory.receiver(name).map(|r| Self {
            name: r.name.clone(),
            mobiles: r.mobiles.clone(),
            schedule: r.schedule.clone(),
        })
    }

    fn synthetic_default(directory: &Directory) -> Self {
        let default = directory.default_receiver();
        Self {
            name: DEFAULT_RECEIVER_NAME.to_string(),
            mobiles: default.mobiles.clone(),
            schedule: default.schedule.clone(),
        }
    }
}

/// Resolve the target for an alert batch: exact match on the declared
/// receiver name, else the global default receiver.
pub fn resolve_alert(directory: &Directory, declared: &str) -> ResolvedReceiver {
    if let Some(receiver) = ResolvedReceiver::configured(directory, declared) {
        trace!(receiver = %receiver.name, "alert receiver matched by name");
        return receiver;
    }

    debug!(declared = %declared, "declared receiver not configured, using default");
    ResolvedReceiver::synthetic_default(directory)
}

/// Resolve the target for a deployment notification.
///
/// Strategies, in priority order; the first hit wins:
/// 1. `context.receiver` override
/// 2. exact application-name mapping
/// 3. application-name prefix mapping, declaration order
/// 4. project mapping, case-insensitive
/// 5. namespace substring mapping, declaration order
/// 6. configured deployment default, else `alert-devops`
/// 7. synthetic receiver from the global default
///
/// Returns `None` only if every strategy including the unconditional
/// fallback fails, which would violate the resolution invariant.
pub fn resolve_argocd(
    directory: &Directory,
    notif: &ArgocdNotification,
) -> Option<ResolvedReceiver> {
    let app_name = &notif.app.metadata.name;

    if let Some(declared) = notif.context_receiver() {
        if let Some(receiver) = ResolvedReceiver::configured(directory, declared) {
            trace!(receiver = %receiver.name, "resolved from notification context");
            return Some(receiver);
        }
    }

    if let Some(routing) = directory.argocd() {
        if let Some(name) = routing.app_exact.get(app_name) {
            if let Some(receiver) = ResolvedReceiver::configured(directory, name) {
                trace!(receiver = %receiver.name, app = %app_name, "resolved from exact app mapping");
                return Some(receiver);
            }
        }

        for (prefix, name) in &routing.app_prefix {
            if app_name.starts_with(prefix.as_str()) {
                if let Some(receiver) = ResolvedReceiver::configured(directory, name) {
                    trace!(
                        receiver = %receiver.name,
                        app = %app_name,
                        prefix = %prefix,
                        "resolved from app prefix mapping"
                    );
                    return Some(receiver);
                }
            }
        }

        let project = notif.app.spec.project.to_lowercase();
        if let Some(name) = routing.project.get(&project) {
            if let Some(receiver) = ResolvedReceiver::configured(directory, name) {
                trace!(receiver = %receiver.name, project = %project, "resolved from project mapping");
                return Some(receiver);
            }
        }

        let namespace = &notif.app.spec.destination.namespace;
        for (pattern, name) in &routing.namespace {
            if namespace.contains(pattern.as_str()) {
                if let Some(receiver) = ResolvedReceiver::configured(directory, name) {
                    trace!(
                        receiver = %receiver.name,
                        namespace = %namespace,
                        pattern = %pattern,
                        "resolved from namespace mapping"
                    );
                    return Some(receiver);
                }
            }
        }
    }

    let fallback_name = directory
        .argocd()
        .and_then(|r| r.default_receiver.as_deref())
        .filter(|n| !n.is_empty())
        .unwrap_or(K8S_ALERT_RECEIVER);

    if let Some(receiver) = ResolvedReceiver::configured(directory, fallback_name) {
        debug!(receiver = %receiver.name, app = %app_name, "no mapping matched, using configured fallback");
        return Some(receiver);
    }

    debug!(app = %app_name, "no mapping matched, using default receiver");
    Some(ResolvedReceiver::synthetic_default(directory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::event::ArgocdNotification;

    fn directory(json: &str) -> Directory {
        Directory::from_config(&Config::from_json(json).unwrap())
    }

    fn notif(json: &str) -> ArgocdNotification {
        serde_json::from_str(json).unwrap()
    }

    /// A directory where every strategy level has a conflicting match for
    /// the app `payments-api` in project `Core` and namespace `prod-eu`.
    fn conflicting_directory() -> Directory {
        directory(
            r#"
{
  "receiver": [
    {"name": "from-context", "mobile": "+10"},
    {"name": "from-exact", "mobile": "+11"},
    {"name": "from-prefix", "mobile": "+12"},
    {"name": "from-project", "mobile": "+13"},
    {"name": "from-namespace", "mobile": "+14"},
    {"name": "from-fallback", "mobile": "+15"},
    {"name": "alert-devops", "mobile": "+16"}
  ],
  "default_receiver": {"mobile": "+99"},
  "argocd": {
    "app_mapping": {"payments-api": "from-exact"},
    "app_prefix_mapping": [{"prefix": "payments-", "receiver": "from-prefix"}],
    "project_mapping": {"core": "from-project"},
    "namespace_mapping": [{"contains": "prod", "receiver": "from-namespace"}],
    "default_receiver": "from-fallback"
  }
}
"#,
        )
    }

    fn full_notif(with_context: bool) -> ArgocdNotification {
        let context = if with_context {
            r#"{"receiver": "from-context"}"#
        } else {
            "{}"
        };
        notif(&format!(
            r#"
{{
  "app": {{
    "metadata": {{"name": "payments-api"}},
    "spec": {{"project": "Core", "destination": {{"namespace": "prod-eu"}}}},
    "status": {{"sync": {{"status": "OutOfSync"}}}}
  }},
  "context": {context}
}}
"#
        ))
    }

    #[test]
    fn test_alert_exact_match() {
        let dir = directory(
            r#"
{
  "receiver": [{"name": "alert-devops", "mobile": "+1,+2"}],
  "default_receiver": {"mobile": "+9"}
}
"#,
        );
        let resolved = resolve_alert(&dir, "alert-devops");
        assert_eq!(resolved.name, "alert-devops");
        assert_eq!(resolved.mobiles, vec!["+1", "+2"]);
    }

    #[test]
    fn test_alert_falls_back_to_default() {
        let dir = directory(
            r#"
{
  "receiver": [{"name": "alert-devops", "mobile": "+1"}],
  "default_receiver": {"mobile": "+9"}
}
"#,
        );
        let resolved = resolve_alert(&dir, "unknown-team");
        assert_eq!(resolved.name, "default");
        assert_eq!(resolved.mobiles, vec!["+9"]);
    }

    #[test]
    fn test_priority_context_beats_everything() {
        let resolved = resolve_argocd(&conflicting_directory(), &full_notif(true)).unwrap();
        assert_eq!(resolved.name, "from-context");
    }

    #[test]
    fn test_priority_exact_beats_prefix() {
        let resolved = resolve_argocd(&conflicting_directory(), &full_notif(false)).unwrap();
        assert_eq!(resolved.name, "from-exact");
    }

    #[test]
    fn test_priority_prefix_beats_project() {
        let dir = directory(
            r#"
{
  "receiver": [
    {"name": "from-prefix", "mobile": "+12"},
    {"name": "from-project", "mobile": "+13"}
  ],
  "default_receiver": {"mobile": "+99"},
  "argocd": {
    "app_prefix_mapping": [{"prefix": "payments-", "receiver": "from-prefix"}],
    "project_mapping": {"core": "from-project"}
  }
}
"#,
        );
        let resolved = resolve_argocd(&dir, &full_notif(false)).unwrap();
        assert_eq!(resolved.name, "from-prefix");
    }

    #[test]
    fn test_priority_project_beats_namespace() {
        let dir = directory(
            r#"
{
  "receiver": [
    {"name": "from-project", "mobile": "+13"},
    {"name": "from-namespace", "mobile": "+14"}
  ],
  "default_receiver": {"mobile": "+99"},
  "argocd": {
    "project_mapping": {"core": "from-project"},
    "namespace_mapping": [{"contains": "prod", "receiver": "from-namespace"}]
  }
}
"#,
        );
        let resolved = resolve_argocd(&dir, &full_notif(false)).unwrap();
        assert_eq!(resolved.name, "from-project");
    }

    #[test]
    fn test_priority_namespace_beats_fallback() {
        let dir = directory(
            r#"
{
  "receiver": [
    {"name": "from-namespace", "mobile": "+14"},
    {"name": "from-fallback", "mobile": "+15"}
  ],
  "default_receiver": {"mobile": "+99"},
  "argocd": {
    "namespace_mapping": [{"contains": "prod", "receiver": "from-namespace"}],
    "default_receiver": "from-fallback"
  }
}
"#,
        );
        let resolved = resolve_argocd(&dir, &full_notif(false)).unwrap();
        assert_eq!(resolved.name, "from-namespace");
    }

    #[test]
    fn test_project_match_is_case_insensitive() {
        let dir = directory(
            r#"
{
  "receiver": [{"name": "from-project", "mobile": "+13"}],
  "default_receiver": {"mobile": "+99"},
  "argocd": {"project_mapping": {"CORE": "from-project"}}
}
"#,
        );
        // notification carries project "Core"
        let resolved = resolve_argocd(&dir, &full_notif(false)).unwrap();
        assert_eq!(resolved.name, "from-project");
    }

    #[test]
    fn test_prefix_entries_evaluated_in_declaration_order() {
        let dir = directory(
            r#"
{
  "receiver": [
    {"name": "first", "mobile": "+1"},
    {"name": "second", "mobile": "+2"}
  ],
  "default_receiver": {"mobile": "+99"},
  "argocd": {
    "app_prefix_mapping": [
      {"prefix": "pay", "receiver": "first"},
      {"prefix": "payments-", "receiver": "second"}
    ]
  }
}
"#,
        );
        let resolved = resolve_argocd(&dir, &full_notif(false)).unwrap();
        assert_eq!(resolved.name, "first");
    }

    #[test]
    fn test_unresolvable_mapping_falls_through() {
        // exact mapping names a receiver that is not configured; the prefix
        // entry must win instead
        let dir = directory(
            r#"
{
  "receiver": [{"name": "from-prefix", "mobile": "+12"}],
  "default_receiver": {"mobile": "+99"},
  "argocd": {
    "app_mapping": {"payments-api": "ghost"},
    "app_prefix_mapping": [{"prefix": "payments-", "receiver": "from-prefix"}]
  }
}
"#,
        );
        let resolved = resolve_argocd(&dir, &full_notif(false)).unwrap();
        assert_eq!(resolved.name, "from-prefix");
    }

    #[test]
    fn test_unmapped_app_uses_configured_fallback() {
        let dir = directory(
            r#"
{
  "receiver": [{"name": "from-fallback", "mobile": "+15"}],
  "default_receiver": {"mobile": "+99"},
  "argocd": {"default_receiver": "from-fallback"}
}
"#,
        );
        let resolved = resolve_argocd(&dir, &full_notif(false)).unwrap();
        assert_eq!(resolved.name, "from-fallback");
    }

    #[test]
    fn test_unmapped_app_uses_alert_devops_when_no_fallback_configured() {
        let dir = directory(
            r#"
{
  "receiver": [{"name": "alert-devops", "mobile": "+16"}],
  "default_receiver": {"mobile": "+99"},
  "argocd": {}
}
"#,
        );
        let resolved = resolve_argocd(&dir, &full_notif(false)).unwrap();
        assert_eq!(resolved.name, "alert-devops");
    }

    #[test]
    fn test_unmapped_app_uses_global_default_last() {
        let dir = directory(
            r#"
{
  "receiver": [],
  "default_receiver": {"mobile": "+99"},
  "argocd": {}
}
"#,
        );
        let resolved = resolve_argocd(&dir, &full_notif(false)).unwrap();
        assert_eq!(resolved.name, "default");
        assert_eq!(resolved.mobiles, vec!["+99"]);
    }

    #[test]
    fn test_no_argocd_tables_still_resolves() {
        let dir = directory(
            r#"
{
  "receiver": [{"name": "alert-devops", "mobile": "+16"}],
  "default_receiver": {"mobile": "+99"}
}
"#,
        );
        let resolved = resolve_argocd(&dir, &full_notif(false)).unwrap();
        assert_eq!(resolved.name, "alert-devops");
    }
}
