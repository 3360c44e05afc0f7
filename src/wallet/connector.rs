// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet connector.
//!
//! ## Connect Flow
//!
//! 1. Locate the provider; if missing, open the install page and fail
//! 2. `eth_requestAccounts` (may prompt; code 4001 means the user said no)
//! 3. First account becomes the active address
//! 4. Optional `personal_sign` over the configured sign-in message
//! 5. Persist the session
//! 6. Subscribe: empty `accountsChanged` or `disconnect` clears the session,
//!    `chainChanged` reloads

use std::sync::{Arc, Mutex};

use alloy::primitives::hex;
use serde_json::json;
use tracing::{debug, info, warn};

use super::host::BrowserHost;
use super::kind::WalletKind;
use super::locator::locate;
use super::provider::{
    accounts_from_value, Eip1193Provider, InjectionSurface, ProviderEvent, ProviderRpcError,
};
use crate::error::{ClientError, ClientResult};
use crate::models::{Session, WalletAddress};
use crate::session::{SessionStore, SignedMessage};

/// JSON-RPC internal error, used when a provider answers with the wrong shape.
const INTERNAL_ERROR_CODE: i64 = -32603;

/// A live wallet connection.
#[derive(Clone)]
pub struct Connection {
    pub wallet: WalletKind,
    pub session: Session,
    pub provider: Arc<dyn Eip1193Provider>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("wallet", &self.wallet)
            .field("session", &self.session)
            .finish()
    }
}

pub struct WalletConnector {
    surface: InjectionSurface,
    host: Arc<dyn BrowserHost>,
    session: Arc<SessionStore>,
    sign_in_message: Option<String>,
    /// Providers that already carry this connector's event listener.
    subscribed: Mutex<Vec<Arc<dyn Eip1193Provider>>>,
}

impl WalletConnector {
    pub fn new(
        surface: InjectionSurface,
        host: Arc<dyn BrowserHost>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            surface,
            host,
            session,
            sign_in_message: None,
            subscribed: Mutex::new(Vec::new()),
        }
    }

    /// Ask the wallet to sign `message` on every connect and pass the
    /// signature to the credential issuer.
    pub fn with_sign_in_message(mut self, message: impl Into<String>) -> Self {
        self.sign_in_message = Some(message.into());
        self
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn connect(&self, kind: &WalletKind) -> ClientResult<Connection> {
        let Some(provider) = locate(&self.surface, kind) else {
            warn!(wallet = %kind, "Wallet provider not found");
            if let Some(url) = kind.install_url() {
                self.host.open_new_tab(url);
            }
            return Err(ClientError::WalletNotInstalled {
                wallet: kind.display_name().to_string(),
            });
        };

        let result = provider
            .request("eth_requestAccounts", json!([]))
            .await
            .map_err(|e| provider_error(kind, e))?;

        let accounts = accounts_from_value(&result);
        let first = accounts.first().ok_or(ClientError::NoAccounts)?;
        let address = WalletAddress::parse(first)?;

        let signature = match &self.sign_in_message {
            Some(message) => Some(sign_in(provider.as_ref(), kind, &address, message).await?),
            None => None,
        };

        let session = self
            .session
            .connect_with_signature(&address, signature.as_ref())
            .await?;

        self.subscribe(&provider);

        info!(wallet = %kind, address = %address, "Wallet connected");
        Ok(Connection {
            wallet: kind.clone(),
            session,
            provider,
        })
    }

    /// Re-attach to a previously persisted session without prompting.
    ///
    /// Returns `None` when nothing is stored or the wallet is gone.
    pub fn restore(&self, kind: &WalletKind) -> Option<Connection> {
        let session = self.session.current();
        if !session.is_connected() {
            return None;
        }
        let provider = locate(&self.surface, kind)?;
        self.subscribe(&provider);

        info!(wallet = %kind, "Restored wallet session");
        Some(Connection {
            wallet: kind.clone(),
            session,
            provider,
        })
    }

    /// Register the event listener once per provider. Reconnecting or
    /// restoring against the same provider reuses the existing listener.
    fn subscribe(&self, provider: &Arc<dyn Eip1193Provider>) {
        let Ok(mut subscribed) = self.subscribed.lock() else {
            warn!("Listener registry poisoned; skipping provider subscription");
            return;
        };
        if subscribed.iter().any(|known| Arc::ptr_eq(known, provider)) {
            debug!("Provider listener already registered");
            return;
        }
        subscribed.push(provider.clone());

        let session = self.session.clone();
        let host = self.host.clone();
        provider.on(Arc::new(move |event: &ProviderEvent| {
            handle_event(&session, host.as_ref(), event)
        }));
    }
}

fn handle_event(session: &SessionStore, host: &dyn BrowserHost, event: &ProviderEvent) {
    match event {
        ProviderEvent::AccountsChanged(accounts) if accounts.is_empty() => {
            info!("Wallet reported no accounts; disconnecting");
            if let Err(e) = session.disconnect() {
                warn!(error = %e, "Failed to clear session after account removal");
            }
        }
        ProviderEvent::AccountsChanged(accounts) => {
            info!(account = %accounts[0], "Wallet account changed");
        }
        ProviderEvent::ChainChanged(chain_id) => {
            info!(chain_id = %chain_id, "Wallet chain changed; reloading");
            host.reload();
        }
        ProviderEvent::Disconnect => {
            info!("Wallet provider disconnected");
            if let Err(e) = session.disconnect() {
                warn!(error = %e, "Failed to clear session after provider disconnect");
            }
        }
    }
}

async fn sign_in(
    provider: &dyn Eip1193Provider,
    kind: &WalletKind,
    address: &WalletAddress,
    message: &str,
) -> ClientResult<SignedMessage> {
    let params = json!([hex::encode_prefixed(message.as_bytes()), address.as_str()]);
    let value = provider
        .request("personal_sign", params)
        .await
        .map_err(|e| provider_error(kind, e))?;

    let signature = value.as_str().ok_or_else(|| ClientError::Provider {
        code: INTERNAL_ERROR_CODE,
        message: "personal_sign returned no signature".to_string(),
    })?;

    Ok(SignedMessage {
        message: message.to_string(),
        signature: signature.to_string(),
    })
}

fn provider_error(kind: &WalletKind, error: ProviderRpcError) -> ClientError {
    if error.is_user_rejection() {
        ClientError::UserRejected {
            wallet: kind.display_name().to_string(),
        }
    } else {
        ClientError::Provider {
            code: error.code,
            message: error.message,
        }
    }
}
