//! Load configuration via `config` crate with env-override support.

use std::{collections::HashMap, ops::Deref, sync::Arc};

use serde::Deserialize;

use super::{
    rules::{ComponentRule, default_component_rules},
    types::{Res, Void},
};

/// Default CRM API root.
fn default_crm_base_url() -> String {
    "https://api.your-crm.com".to_string()
}

/// Default code search API root (Bitbucket Cloud).
fn default_code_search_base_url() -> String {
    "https://api.bitbucket.org/2.0".to_string()
}

/// Default code search workspace.
fn default_code_search_workspace() -> String {
    "your-workspace".to_string()
}

/// Default repository searched for bug keywords.
fn default_code_search_repo_slug() -> String {
    "sobta-core-repo".to_string()
}

/// Default Jira site.
fn default_jira_base_url() -> String {
    "https://your-domain.atlassian.net".to_string()
}

/// Default Jira project that receives triaged issues.
fn default_jira_project_key() -> String {
    "PROJ".to_string()
}

/// Default tag prepended to every issue summary.
fn default_jira_summary_tag() -> String {
    "[SOBTA Triage]".to_string()
}

/// Default timeout, in seconds, for every outbound request.
fn default_http_timeout_secs() -> u64 {
    5
}

/// Configuration for the triage actions.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// CRM API root (`CRM_BASE_URL`).
    #[serde(default = "default_crm_base_url")]
    pub crm_base_url: String,
    /// Code search API root (`CODE_SEARCH_BASE_URL`).
    #[serde(default = "default_code_search_base_url")]
    pub code_search_base_url: String,
    /// Code search workspace (`CODE_SEARCH_WORKSPACE`).
    #[serde(default = "default_code_search_workspace")]
    pub code_search_workspace: String,
    /// Repository searched for keywords (`CODE_SEARCH_REPO_SLUG`).
    #[serde(default = "default_code_search_repo_slug")]
    pub code_search_repo_slug: String,
    /// Jira site root (`JIRA_BASE_URL`).
    #[serde(default = "default_jira_base_url")]
    pub jira_base_url: String,
    /// Account the application authenticates to Jira as (`JIRA_EMAIL`).
    #[serde(default)]
    pub jira_email: String,
    /// Project that receives triaged issues (`JIRA_PROJECT_KEY`).
    #[serde(default = "default_jira_project_key")]
    pub jira_project_key: String,
    /// Tag prepended to issue summaries (`JIRA_SUMMARY_TAG`).
    #[serde(default = "default_jira_summary_tag")]
    pub jira_summary_tag: String,
    /// Timeout applied to every outbound request (`HTTP_TIMEOUT_SECS`).
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Ordered path-to-team rules; the built-in table is used when absent.
    #[serde(default)]
    pub component_rules: Option<Vec<ComponentRule>>,
    /// Named secrets (`SECRETS__<NAME>`); the process environment is consulted as a fallback.
    #[serde(default)]
    pub secrets: HashMap<String, String>,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            crm_base_url: default_crm_base_url(),
            code_search_base_url: default_code_search_base_url(),
            code_search_workspace: default_code_search_workspace(),
            code_search_repo_slug: default_code_search_repo_slug(),
            jira_base_url: default_jira_base_url(),
            jira_email: String::new(),
            jira_project_key: default_jira_project_key(),
            jira_summary_tag: default_jira_summary_tag(),
            http_timeout_secs: default_http_timeout_secs(),
            component_rules: None,
            secrets: HashMap::new(),
        }
    }
}

impl ConfigInner {
    /// The effective path-to-team rule table.
    pub fn component_rules(&self) -> Vec<ComponentRule> {
        self.component_rules.clone().unwrap_or_else(default_component_rules)
    }

    fn validate(&self) -> Void {
        if self.http_timeout_secs < 1 || self.http_timeout_secs > 120 {
            return Err(anyhow::anyhow!("HTTP timeout must be between 1 and 120 seconds."));
        }

        if self.jira_project_key.trim().is_empty() {
            return Err(anyhow::anyhow!("Jira project key must not be empty."));
        }

        for (name, value) in [("CRM", &self.crm_base_url), ("Code search", &self.code_search_base_url), ("Jira", &self.jira_base_url)] {
            url::Url::parse(value).map_err(|e| anyhow::anyhow!("{name} base URL `{value}` is invalid: {e}"))?;
        }

        if self.component_rules.iter().flatten().any(|r| r.substring.is_empty()) {
            return Err(anyhow::anyhow!("Component rules must not have an empty substring."));
        }

        Ok(())
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("TRIAGE_ACTIONS").prefix_separator("_").separator("__"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let inner: ConfigInner = cfg.build()?.try_deserialize()?;
        inner.validate()?;

        Ok(inner.into())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_validate() {
        let inner = ConfigInner::default();

        assert!(inner.validate().is_ok());
        assert_eq!(inner.http_timeout_secs, 5);
        assert_eq!(inner.jira_project_key, "PROJ");
        assert_eq!(inner.component_rules(), default_component_rules());
    }

    #[test]
    fn test_rejects_bad_values() {
        let inner = ConfigInner { http_timeout_secs: 0, ..Default::default() };
        assert!(inner.validate().is_err());

        let inner = ConfigInner {
            jira_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(inner.validate().unwrap_err().to_string().contains("Jira base URL"));

        let inner = ConfigInner {
            component_rules: Some(vec![ComponentRule::new("", "Everything", "Team-All")]),
            ..Default::default()
        };
        assert!(inner.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("triage-actions-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
jira_email = "bot@example.com"
jira_project_key = "BUG"
http_timeout_secs = 10

[secrets]
CRM_API_KEY = "crm-secret"

[[component_rules]]
substring = "search"
component = "Search"
team = "Team-Apollo"
"#
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.jira_email, "bot@example.com");
        assert_eq!(config.jira_project_key, "BUG");
        assert_eq!(config.http_timeout_secs, 10);
        assert_eq!(config.crm_base_url, "https://api.your-crm.com");
        assert_eq!(config.component_rules(), vec![ComponentRule::new("search", "Search", "Team-Apollo")]);
        assert!(config.secrets.values().any(|v| v == "crm-secret"));
    }
}
