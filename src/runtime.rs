//! Runtime services and shared state for the triage actions.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::instrument;

use crate::{
    action::{self, Action, event::Event},
    base::{config::Config, types::Res},
    service::{http::HttpClient, secrets::SecretStore},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the HTTP client, secret store, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The HTTP client instance.
    pub http: HttpClient,
    /// The secret store instance.
    pub secrets: SecretStore,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        // Initialize the HTTP client.
        let http = HttpClient::reqwest(&config)?;

        // Initialize the secret store.
        let secrets = SecretStore::config(&config);

        Ok(Self { config, http, secrets })
    }

    /// Assemble a runtime from already-built services.
    pub fn from_parts(config: Config, http: HttpClient, secrets: SecretStore) -> Self {
        Self { config, http, secrets }
    }

    /// Run the named action against a raw `{ "payload": { ... } }` event.
    ///
    /// Only a malformed event is an error; handler outcomes are always values.
    #[instrument(skip(self, event))]
    pub async fn invoke(&self, action: Action, event: Value) -> Res<Value> {
        match action {
            Action::GetUserDetails => to_value(action::get_user_details(decode(action, event)?, self).await),
            Action::SearchCodebase => to_value(action::search_codebase(decode(action, event)?, self).await),
            Action::CreateJiraTicket => to_value(action::create_jira_ticket(decode(action, event)?, self).await),
        }
    }
}

fn decode<P: DeserializeOwned>(action: Action, event: Value) -> Res<Event<P>> {
    serde_json::from_value(event).map_err(|e| anyhow::anyhow!("Malformed `{action}` event: {e}"))
}

fn to_value<T: Serialize>(result: T) -> Res<Value> {
    Ok(serde_json::to_value(result)?)
}
