// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use super::{CredentialSource, RetryPolicy};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Clone)]
pub struct RequestClient {
    http: Client,
    base_url: Url,
    retry: RetryPolicy,
    credentials: Option<Arc<dyn CredentialSource>>,
}

impl std::fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

impl RequestClient {
    pub fn new(base_url: Url, retry: RetryPolicy, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            retry,
            credentials: None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(config.api_url.clone(), config.retry, config.http_timeout)
    }

    /// Attach a bearer credential source to every request.
    pub fn with_credentials(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(source);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Send a request, retrying transient failures per the retry policy.
    ///
    /// `path` is appended to the base URL and must start with `/`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let request_id = Uuid::new_v4();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.attempt(&method, path, body, request_id).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.retry.attempts => {
                    warn!(
                        request_id = %request_id,
                        method = %method,
                        path = %path,
                        attempt,
                        max_attempts = self.retry.attempts,
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(e) => {
                    warn!(
                        request_id = %request_id,
                        method = %method,
                        path = %path,
                        attempt,
                        error = %e,
                        "Request failed"
                    );
                    return Err(e);
                }
            }
        }
    }

    async fn attempt(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        request_id: Uuid,
    ) -> ClientResult<Value> {
        let url = self.endpoint(path);
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(token) = self.credentials.as_ref().and_then(|c| c.bearer_token()) {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("{method} {path} failed: {e}")))?;

        let status = response.status();
        debug!(request_id = %request_id, method = %method, path = %path, status = status.as_u16(), "Response received");

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("{method} {path}")));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_json_content_type(&content_type) {
            return Err(ClientError::MalformedResponse(format!(
                "{method} {path} returned content type '{content_type}', expected JSON"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(format!("{method} {path} body read failed: {e}")))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::MalformedResponse(format!("{method} {path} invalid JSON: {e}"))
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let value = self.request(Method::GET, path, None).await?;
        unwrap_envelope(value)
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = encode(body)?;
        let value = self.request(Method::POST, path, Some(&body)).await?;
        unwrap_envelope(value)
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = encode(body)?;
        let value = self.request(Method::PUT, path, Some(&body)).await?;
        unwrap_envelope(value)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

fn encode<B: Serialize>(body: &B) -> ClientResult<Value> {
    serde_json::to_value(body).map_err(|e| ClientError::Encode(e.to_string()))
}

/// `application/json` or any `+json` structured syntax suffix.
fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

#[derive(Debug, Deserialize)]
struct BackendEnvelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Unwrap the backend's `{ success, data, error }` envelope into `T`.
///
/// Bodies without a boolean `success` field are taken as the payload itself.
pub fn unwrap_envelope<T: DeserializeOwned>(value: Value) -> ClientResult<T> {
    let is_envelope = value
        .get("success")
        .map(Value::is_boolean)
        .unwrap_or(false);

    let payload = if is_envelope {
        let envelope: BackendEnvelope = serde_json::from_value(value)
            .map_err(|e| ClientError::MalformedResponse(format!("invalid envelope: {e}")))?;
        if !envelope.success {
            return Err(ClientError::Backend(
                envelope
                    .error
                    .or(envelope.message)
                    .unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        envelope.data
    } else {
        value
    };

    serde_json::from_value(payload)
        .map_err(|e| ClientError::MalformedResponse(format!("unexpected payload shape: {e}")))
}
