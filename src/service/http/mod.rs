//! Outbound HTTP for the action handlers.
//!
//! Handlers depend on the narrow `GenericHttpClient` trait rather than a concrete
//! client, so they can be exercised without a live network.

pub mod reqwest;

use std::{fmt, ops::Deref, sync::Arc};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::base::types::Res;

// Types.

/// HTTP verbs the handlers use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Credentials attached to a request.
#[derive(Clone, PartialEq, Eq)]
pub enum HttpAuth {
    Bearer(String),
    Basic { username: String, password: String },
}

impl fmt::Debug for HttpAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(***)"),
            Self::Basic { username, .. } => write!(f, "Basic({username}:***)"),
        }
    }
}

/// A single outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub auth: Option<HttpAuth>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            auth: None,
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            auth: None,
            body: Some(body),
        }
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(HttpAuth::Bearer(token.into()));
        self
    }

    pub fn basic(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(HttpAuth::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }
}

/// A received response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let status_text = ::reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();

        Self {
            status,
            status_text,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Res<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

// Traits.

/// Generic HTTP client trait that clients must implement.
///
/// A response with any status is `Ok`; only transport failures (connection errors,
/// timeouts, unreadable bodies) are `Err`.
#[async_trait]
pub trait GenericHttpClient: Send + Sync + 'static {
    /// Send the request and collect the full response body.
    async fn send(&self, request: HttpRequest) -> Res<HttpResponse>;
}

// Structs.

/// HTTP client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<dyn GenericHttpClient>,
}

impl Deref for HttpClient {
    type Target = dyn GenericHttpClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl HttpClient {
    pub fn new(inner: Arc<dyn GenericHttpClient>) -> Self {
        Self { inner }
    }
}
