// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EIP-1193 provider reached over HTTP JSON-RPC.
//!
//! Desktop wallets (Frame, for example) expose the same request methods on a
//! local port. Plain HTTP has no push channel, so listeners are kept but
//! never fire.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::provider::{Eip1193Provider, ProviderInfo, ProviderListener, ProviderRpcError};

/// JSON-RPC "internal error" code used for transport-level failures.
const TRANSPORT_ERROR_CODE: i64 = -32603;

pub struct RpcProvider {
    endpoint: Url,
    info: ProviderInfo,
    http: Client,
    next_id: AtomicU64,
    listeners: Mutex<Vec<ProviderListener>>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl RpcProvider {
    pub fn new(endpoint: Url, info: ProviderInfo, timeout: Duration) -> Result<Self, ProviderRpcError> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            ProviderRpcError::new(TRANSPORT_ERROR_CODE, format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            endpoint,
            info,
            http,
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Eip1193Provider for RpcProvider {
    fn info(&self) -> ProviderInfo {
        self.info.clone()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(endpoint = %self.endpoint, method = %method, id, "Wallet RPC request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderRpcError::new(TRANSPORT_ERROR_CODE, format!("{method} failed: {e}")))?;

        let body: RpcResponse = response.json().await.map_err(|e| {
            ProviderRpcError::new(TRANSPORT_ERROR_CODE, format!("{method} invalid response: {e}"))
        })?;

        if let Some(error) = body.error {
            return Err(ProviderRpcError::new(error.code, error.message));
        }
        Ok(body.result.unwrap_or(Value::Null))
    }

    fn on(&self, listener: ProviderListener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }
}
