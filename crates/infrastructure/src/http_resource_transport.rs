use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use teamtrack_application::{ResourceTransport, TransportError, TransportErrorKind};
use teamtrack_core::{AppError, AppResult};
use tracing::debug;
use url::Url;

/// REST transport backed by `reqwest`.
///
/// Paths are joined onto the API base URL. A configured bearer token is sent
/// with every request.
#[derive(Debug, Clone)]
pub struct HttpResourceTransport {
    http_client: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl HttpResourceTransport {
    /// Creates a transport for `base_url` with a per-request timeout.
    pub fn new(base_url: Url, bearer_token: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build resource HTTP client: {error}"))
            })?;

        Ok(Self::with_client(http_client, base_url, bearer_token))
    }

    /// Creates a transport around an existing client.
    #[must_use]
    pub fn with_client(
        http_client: reqwest::Client,
        mut base_url: Url,
        bearer_token: Option<String>,
    ) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(path.as_str());
        }

        Self {
            http_client,
            base_url,
            bearer_token: bearer_token.filter(|token| !token.trim().is_empty()),
        }
    }

    /// Returns the base URL every path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| {
                TransportError::new(
                    TransportErrorKind::BadRequest,
                    format!("invalid resource path '{path}': {error}"),
                )
            })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let url = self.endpoint(path)?;
        let mut builder = self.http_client.request(method.clone(), url);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|error| {
            TransportError::new(
                TransportErrorKind::Network,
                format!("{method} {path} failed: {error}"),
            )
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|error| {
            TransportError {
                kind: TransportErrorKind::Decode,
                status: Some(status.as_u16()),
                message: format!("failed to read {method} {path} response: {error}"),
            }
        })?;
        debug!(method = %method, path, status = status.as_u16(), "resource request completed");

        if !status.is_success() {
            return Err(TransportError::from_status(
                status.as_u16(),
                failure_message(status, text.as_str()),
            ));
        }

        if text.trim().is_empty() {
            return Ok(Value::Bool(true));
        }

        serde_json::from_str(text.as_str()).map_err(|error| TransportError {
            kind: TransportErrorKind::Decode,
            status: Some(status.as_u16()),
            message: format!("{method} {path} returned invalid JSON: {error}"),
        })
    }
}

fn failure_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("message")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    });

    from_body
        .or_else(|| {
            let body = body.trim();
            (!body.is_empty()).then(|| body.to_owned())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_owned()
        })
}

#[async_trait]
impl ResourceTransport for HttpResourceTransport {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value, TransportError> {
        self.send(Method::DELETE, path, None).await
    }
}
