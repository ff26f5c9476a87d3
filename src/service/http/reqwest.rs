//! `reqwest`-backed implementation of the HTTP client.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::base::{config::Config, types::Res};

use super::{GenericHttpClient, HttpAuth, HttpClient, HttpMethod, HttpRequest, HttpResponse};

/// User-Agent header value sent with every request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Extra methods on `HttpClient` applied by the reqwest implementation.

impl HttpClient {
    pub fn reqwest(config: &Config) -> Res<Self> {
        let client = ReqwestHttpClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Specific implementations.

/// Reqwest HTTP client implementation.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: ::reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new client with the configured request timeout.
    #[instrument(name = "ReqwestHttpClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = ::reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl GenericHttpClient for ReqwestHttpClient {
    #[instrument(name = "ReqwestHttpClient::send", skip_all, fields(method = ?request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Res<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        builder = builder.header(::reqwest::header::ACCEPT, "application/json");

        builder = match &request.auth {
            Some(HttpAuth::Bearer(token)) => builder.bearer_auth(token),
            Some(HttpAuth::Basic { username, password }) => builder.basic_auth(username, Some(password)),
            None => builder,
        };

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("Received HTTP {status} ({} bytes).", body.len());

        Ok(HttpResponse::new(status, body))
    }
}
