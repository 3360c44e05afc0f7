// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EIP-1193 provider boundary.
//!
//! A provider is injected by a wallet extension (or reached over a local RPC
//! port) and is never owned by the client. It exposes a request/response
//! method and an event subscription for account and chain changes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// EIP-1193 error code: the user rejected the request.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Identifying flags a provider advertises (`isMetaMask`, `isCoinbaseWallet`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderInfo {
    pub is_metamask: bool,
    pub is_coinbase_wallet: bool,
    /// Free-form name some wallets expose (e.g. EIP-6963 `info.name`).
    pub name: Option<String>,
    /// Reverse-DNS or short id (e.g. `io.rabby`, `trust`).
    pub id: Option<String>,
}

/// Error object returned by `request`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("provider error {code}: {message}")]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(USER_REJECTED_CODE, "User rejected the request.")
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == USER_REJECTED_CODE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// `accountsChanged`; an empty list means the wallet disconnected us.
    AccountsChanged(Vec<String>),
    /// `chainChanged` with the new hex chain id.
    ChainChanged(String),
    /// `disconnect`
    Disconnect,
}

pub type ProviderListener = Arc<dyn Fn(&ProviderEvent) + Send + Sync>;

#[async_trait]
pub trait Eip1193Provider: Send + Sync {
    fn info(&self) -> ProviderInfo;

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError>;

    /// Subscribe to provider events. Listeners live as long as the provider.
    fn on(&self, listener: ProviderListener);
}

/// What the host environment has injected.
///
/// Mirrors `window.ethereum` being missing, a single object, or carrying a
/// `providers` list when several extensions are installed.
#[derive(Clone, Default)]
pub enum InjectionSurface {
    #[default]
    Absent,
    Single(Arc<dyn Eip1193Provider>),
    Many(Vec<Arc<dyn Eip1193Provider>>),
}

impl InjectionSurface {
    pub fn providers(&self) -> Vec<Arc<dyn Eip1193Provider>> {
        match self {
            InjectionSurface::Absent => Vec::new(),
            InjectionSurface::Single(provider) => vec![provider.clone()],
            InjectionSurface::Many(providers) => providers.clone(),
        }
    }

    pub fn is_absent(&self) -> bool {
        match self {
            InjectionSurface::Absent => true,
            InjectionSurface::Single(_) => false,
            InjectionSurface::Many(providers) => providers.is_empty(),
        }
    }
}

impl std::fmt::Debug for InjectionSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let infos: Vec<ProviderInfo> = self.providers().iter().map(|p| p.info()).collect();
        f.debug_tuple("InjectionSurface").field(&infos).finish()
    }
}

/// Pulls the account list out of an `eth_requestAccounts` / `eth_accounts` result.
pub fn accounts_from_value(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
