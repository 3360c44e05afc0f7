// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Local Storage Module
//!
//! A browser-`localStorage`-shaped key/value surface: string keys, string
//! values, no expiry, no cross-process coordination (last writer wins).
//!
//! ## Backends
//!
//! - [`MemoryStorage`] - process-local map, used by tests and embedders that
//!   manage persistence themselves
//! - [`LocalDatabase`] - redb file, survives restarts the way browser
//!   storage survives page reloads
//!
//! ## Keys
//!
//! ```text
//! token           # bearer credential
//! walletAddress   # active wallet address
//! ```

pub mod local_db;
pub mod memory;

pub use local_db::LocalDatabase;
pub use memory::MemoryStorage;

/// Storage key holding the bearer credential.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the connected wallet address.
pub const WALLET_ADDRESS_KEY: &str = "walletAddress";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("storage lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key/value storage with `localStorage` semantics.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}
