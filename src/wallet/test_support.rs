// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Scriptable provider for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::provider::{
    Eip1193Provider, ProviderEvent, ProviderInfo, ProviderListener, ProviderRpcError,
};

pub struct MockProvider {
    info: ProviderInfo,
    responses: Mutex<HashMap<String, Result<Value, ProviderRpcError>>>,
    calls: Mutex<Vec<(String, Value)>>,
    listeners: Mutex<Vec<ProviderListener>>,
}

impl MockProvider {
    pub fn with_info(info: ProviderInfo) -> Arc<Self> {
        Arc::new(Self {
            info,
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
        })
    }

    pub fn metamask() -> Arc<Self> {
        Self::with_info(ProviderInfo {
            is_metamask: true,
            ..ProviderInfo::default()
        })
    }

    pub fn coinbase() -> Arc<Self> {
        Self::with_info(ProviderInfo {
            is_coinbase_wallet: true,
            ..ProviderInfo::default()
        })
    }

    pub fn respond(&self, method: &str, result: Result<Value, ProviderRpcError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), result);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    pub fn emit(&self, event: ProviderEvent) {
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener(&event);
        }
    }
}

#[async_trait]
impl Eip1193Provider for MockProvider {
    fn info(&self) -> ProviderInfo {
        self.info.clone()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        self.responses
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .unwrap_or_else(|| Err(ProviderRpcError::new(4200, format!("unsupported method {method}"))))
    }

    fn on(&self, listener: ProviderListener) {
        self.listeners.lock().unwrap().push(listener);
    }
}
