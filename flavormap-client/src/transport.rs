//! Transport to the primary backend and the static snapshot
//!
//! The transport only moves JSON bodies; shape checks and record coercion
//! happen in the source loader.

use std::time::Duration;

use async_trait::async_trait;
use flavormap_common::config::TomlConfig;
use flavormap_common::SpotDraft;
use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use tracing::debug;

use crate::error::TransportError;

const USER_AGENT: &str = concat!("FlavorMap/", env!("CARGO_PKG_VERSION"));

/// Reads and writes spots over some transport
#[async_trait]
pub trait SpotTransport: Send + Sync {
    /// Read the dynamic spots resource; success body is `{ "spots": [...] }`
    async fn fetch_primary(&self) -> Result<Value, TransportError>;

    /// Read the static snapshot; success body is a bare JSON array
    async fn fetch_secondary(&self) -> Result<Value, TransportError>;

    /// Create a spot on the primary backend, returning the response body
    async fn create_spot(&self, draft: &SpotDraft) -> Result<Value, TransportError>;
}

/// HTTP transport built on reqwest
pub struct HttpTransport {
    http_client: reqwest::Client,
    api_url: String,
    snapshot_url: String,
}

impl HttpTransport {
    /// Create a transport; requests never time out unless `timeout` is given
    pub fn new(
        api_url: impl Into<String>,
        snapshot_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        Ok(Self {
            http_client,
            api_url: api_url.into(),
            snapshot_url: snapshot_url.into(),
        })
    }

    pub fn from_config(config: &TomlConfig) -> Result<Self, TransportError> {
        Self::new(
            config.api_url.clone(),
            config.snapshot_url.clone(),
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn snapshot_url(&self) -> &str {
        &self.snapshot_url
    }

    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        debug!(url = %url, "GET");

        let response = self
            .http_client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.json::<Value>().await.ok().and_then(|b| error_message(&b));
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::MalformedBody(e.to_string()))
    }
}

#[async_trait]
impl SpotTransport for HttpTransport {
    async fn fetch_primary(&self) -> Result<Value, TransportError> {
        self.get_json(&self.api_url).await
    }

    async fn fetch_secondary(&self) -> Result<Value, TransportError> {
        self.get_json(&self.snapshot_url).await
    }

    async fn create_spot(&self, draft: &SpotDraft) -> Result<Value, TransportError> {
        debug!(url = %self.api_url, name = %draft.name, "POST");

        let response = self
            .http_client
            .post(&self.api_url)
            .json(draft)
            .send()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let status = response.status();
        // Body is optional on both paths; an unparsable body is treated as empty
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }
}

/// Extract display text from an error body: `{ "error": "..." }` or
/// `{ "error": { "message": "..." } }`
pub fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("message").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}
