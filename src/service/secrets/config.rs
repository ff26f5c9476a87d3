//! Secret store backed by the loaded configuration, falling back to the process environment.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::base::{config::Config, types::Res};

use super::{GenericSecretStore, SecretStore};

// Extra methods on `SecretStore` applied by the config implementation.

impl SecretStore {
    pub fn config(config: &Config) -> Self {
        Self {
            inner: Arc::new(ConfigSecretStore::new(config)),
        }
    }
}

/// Config-backed secret store.
#[derive(Clone)]
pub struct ConfigSecretStore {
    config: Config,
}

impl ConfigSecretStore {
    pub fn new(config: &Config) -> Self {
        Self { config: config.clone() }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        // Keys sourced from the environment arrive lowercased.
        self.config
            .secrets
            .get(name)
            .or_else(|| self.config.secrets.get(&name.to_lowercase()))
            .cloned()
    }
}

#[async_trait]
impl GenericSecretStore for ConfigSecretStore {
    #[instrument(name = "ConfigSecretStore::get_secret", skip(self))]
    async fn get_secret(&self, name: &str) -> Res<String> {
        let value = match self.lookup(name) {
            Some(value) => value,
            None => {
                debug!("Secret not in config; checking environment.");
                std::env::var(name).map_err(|_| anyhow::anyhow!("Secret `{name}` is not configured."))?
            }
        };

        if value.trim().is_empty() {
            return Err(anyhow::anyhow!("Secret `{name}` is empty."));
        }

        Ok(value)
    }
}
