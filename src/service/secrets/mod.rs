//! Named secret lookup for the action handlers.

pub mod config;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Res;

/// Bearer token for the CRM.
pub const CRM_API_KEY: &str = "CRM_API_KEY";

/// Bearer token for the code search API.
pub const BITBUCKET_API_TOKEN: &str = "BITBUCKET_API_TOKEN";

/// API token paired with the configured Jira account.
pub const JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";

// Traits.

/// Generic secret store trait that stores must implement.
///
/// Secrets are resolved on every call; implementations should not cache.
#[async_trait]
pub trait GenericSecretStore: Send + Sync + 'static {
    /// Get the secret with the given name, failing if it is missing or empty.
    async fn get_secret(&self, name: &str) -> Res<String>;
}

// Structs.

/// Secret store for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct SecretStore {
    inner: Arc<dyn GenericSecretStore>,
}

impl Deref for SecretStore {
    type Target = dyn GenericSecretStore;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl SecretStore {
    pub fn new(inner: Arc<dyn GenericSecretStore>) -> Self {
        Self { inner }
    }
}
