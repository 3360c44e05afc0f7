// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Store
//!
//! The single owner of the persisted login state. Everything that needs
//! the wallet address or bearer credential goes through a shared
//! `Arc<SessionStore>` instead of reading storage keys directly.
//!
//! ## Invariant
//!
//! `token` and `walletAddress` are written and cleared together. A failed
//! second write rolls back the first, and a read that finds only one of the
//! two keys reports the session as disconnected.

pub mod credentials;

use std::sync::Arc;

use tracing::{info, warn};

pub use credentials::{derive_token, CredentialIssuer, SignedMessage};

use crate::error::{ClientError, ClientResult};
use crate::http::CredentialSource;
use crate::models::{Session, WalletAddress};
use crate::storage::{SessionStorage, TOKEN_KEY, WALLET_ADDRESS_KEY};
use crate::wallet::BrowserHost;

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    issuer: CredentialIssuer,
    host: Arc<dyn BrowserHost>,
}

impl SessionStore {
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        issuer: CredentialIssuer,
        host: Arc<dyn BrowserHost>,
    ) -> Self {
        Self {
            storage,
            issuer,
            host,
        }
    }

    /// Obtain a credential for `address` and persist the session.
    pub async fn connect(&self, address: &WalletAddress) -> ClientResult<Session> {
        self.connect_with_signature(address, None).await
    }

    /// Like [`connect`](Self::connect), passing a wallet signature through
    /// to the credential issuer.
    pub async fn connect_with_signature(
        &self,
        address: &WalletAddress,
        signature: Option<&SignedMessage>,
    ) -> ClientResult<Session> {
        let token = self.issuer.issue(address, signature).await?;
        self.persist(address, &token)?;
        info!(wallet = %address, "Session connected");
        Ok(Session::connected(address.clone(), token))
    }

    fn persist(&self, address: &WalletAddress, token: &str) -> ClientResult<()> {
        self.storage.set_item(WALLET_ADDRESS_KEY, address.as_str())?;
        if let Err(e) = self.storage.set_item(TOKEN_KEY, token) {
            // Keep the pair consistent
            let _ = self.storage.remove_item(WALLET_ADDRESS_KEY);
            return Err(e.into());
        }
        Ok(())
    }

    /// Clear the session and reload the host.
    pub fn disconnect(&self) -> ClientResult<()> {
        self.clear()?;
        info!("Session disconnected");
        self.host.reload();
        Ok(())
    }

    /// Clear both keys without reloading.
    pub fn clear(&self) -> ClientResult<()> {
        let address = self.storage.remove_item(WALLET_ADDRESS_KEY);
        let token = self.storage.remove_item(TOKEN_KEY);
        address?;
        token?;
        Ok(())
    }

    /// The stored bearer credential, if any.
    pub fn token(&self) -> Option<String> {
        self.current().token
    }

    pub fn wallet_address(&self) -> Option<WalletAddress> {
        self.current().wallet_address
    }

    /// The connected address, or `NotConnected`.
    pub fn require_address(&self) -> ClientResult<WalletAddress> {
        self.wallet_address().ok_or(ClientError::NotConnected)
    }

    pub fn is_connected(&self) -> bool {
        self.current().is_connected()
    }

    /// Read the persisted session, enforcing the both-or-neither invariant.
    pub fn current(&self) -> Session {
        let token = self.read(TOKEN_KEY);
        let address = self
            .read(WALLET_ADDRESS_KEY)
            .and_then(|raw| match WalletAddress::parse(&raw) {
                Ok(address) => Some(address),
                Err(_) => {
                    warn!(stored = %raw, "Ignoring unparsable stored wallet address");
                    None
                }
            });

        match (address, token) {
            (Some(address), Some(token)) => Session::connected(address, token),
            _ => Session::default(),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key = %key, error = %e, "Session storage read failed");
                None
            }
        }
    }
}

impl CredentialSource for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("issuer", &self.issuer)
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError, StorageResult};
    use crate::wallet::RecordingHost;

    const ADDR: &str = "0x742d35cc6634c0532925a3b844bc9e7595f4ab12";

    fn store() -> (SessionStore, Arc<MemoryStorage>, Arc<RecordingHost>) {
        let storage = Arc::new(MemoryStorage::new());
        let host = Arc::new(RecordingHost::new());
        let store = SessionStore::new(storage.clone(), CredentialIssuer::Derived, host.clone());
        (store, storage, host)
    }

    #[tokio::test]
    async fn connect_persists_address_and_token() {
        let (store, storage, _) = store();
        let address = WalletAddress::parse(ADDR).unwrap();

        let session = store.connect(&address).await.unwrap();
        assert!(session.is_connected());

        let token = store.token().unwrap();
        assert_eq!(Some(token.clone()), session.token);
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), Some(token));
        assert_eq!(
            storage.get_item(WALLET_ADDRESS_KEY).unwrap().as_deref(),
            Some(ADDR)
        );
        assert_eq!(store.wallet_address(), Some(address));
    }

    #[tokio::test]
    async fn disconnect_clears_both_keys_and_reloads() {
        let (store, storage, host) = store();
        store
            .connect(&WalletAddress::parse(ADDR).unwrap())
            .await
            .unwrap();

        store.disconnect().unwrap();

        assert_eq!(store.token(), None);
        assert_eq!(store.wallet_address(), None);
        assert!(storage.is_empty());
        assert_eq!(host.reload_count(), 1);
    }

    #[test]
    fn clear_does_not_reload() {
        let (store, _, host) = store();
        store.clear().unwrap();
        assert_eq!(host.reload_count(), 0);
    }

    #[test]
    fn half_written_session_reads_as_disconnected() {
        let (store, storage, _) = store();
        storage.set_item(TOKEN_KEY, "orphan-token").unwrap();

        assert!(!store.is_connected());
        assert_eq!(store.token(), None);
    }

    #[tokio::test]
    async fn require_address_reports_missing_session() {
        let (store, _, _) = store();
        let err = store.require_address().unwrap_err();
        assert!(matches!(err, ClientError::NotConnected));
        assert_eq!(err.error_code(), "not_connected");

        let address = WalletAddress::parse(ADDR).unwrap();
        store.connect(&address).await.unwrap();
        assert_eq!(store.require_address().unwrap(), address);
    }

    #[test]
    fn unparsable_stored_address_reads_as_disconnected() {
        let (store, storage, _) = store();
        storage.set_item(TOKEN_KEY, "tok").unwrap();
        storage.set_item(WALLET_ADDRESS_KEY, "not-an-address").unwrap();

        assert_eq!(store.current(), Session::default());
    }

    #[tokio::test]
    async fn session_survives_a_new_store_over_the_same_storage() {
        let (store, storage, host) = store();
        let session = store
            .connect(&WalletAddress::parse(ADDR).unwrap())
            .await
            .unwrap();

        let reopened = SessionStore::new(storage, CredentialIssuer::Derived, host);
        assert_eq!(reopened.current(), session);
    }

    /// Storage that refuses to write the token key.
    struct TokenWriteFails(MemoryStorage);

    impl SessionStorage for TokenWriteFails {
        fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
            if key == TOKEN_KEY {
                return Err(StorageError::Poisoned);
            }
            self.0.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> StorageResult<()> {
            self.0.remove_item(key)
        }
    }

    #[tokio::test]
    async fn failed_token_write_rolls_back_address() {
        let storage = Arc::new(TokenWriteFails(MemoryStorage::new()));
        let store = SessionStore::new(
            storage.clone(),
            CredentialIssuer::Derived,
            Arc::new(RecordingHost::new()),
        );

        let result = store.connect(&WalletAddress::parse(ADDR).unwrap()).await;
        assert!(result.is_err());
        assert!(storage.0.is_empty());
    }

    #[tokio::test]
    async fn bearer_token_comes_from_storage() {
        let (store, _, _) = store();
        assert_eq!(store.bearer_token(), None);
        store
            .connect(&WalletAddress::parse(ADDR).unwrap())
            .await
            .unwrap();
        assert_eq!(store.bearer_token(), store.token());
    }
}
