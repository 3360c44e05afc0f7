// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client error taxonomy.
//!
//! Every failure in the wallet, session, HTTP and facade layers resolves to a
//! [`ClientError`]. None of them is fatal to the process: the CLI prints the
//! message, and library callers decide how to render it.

use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No injected provider matched the requested wallet.
    #[error("{wallet} is not installed")]
    WalletNotInstalled { wallet: String },

    /// The user declined the wallet's authorization prompt (EIP-1193 code 4001).
    #[error("Connection request was rejected in {wallet}")]
    UserRejected { wallet: String },

    #[error("Wallet returned no accounts")]
    NoAccounts,

    /// An operation needed the connected address but no session is stored.
    #[error("No wallet connected")]
    NotConnected,

    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    /// Any other provider-side RPC failure.
    #[error("Wallet provider error {code}: {message}")]
    Provider { code: i64, message: String },

    /// Network-level failure (connect, timeout, reset).
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-2xx response other than 404.
    #[error("{method} {path} returned {status}: {body}")]
    Status {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Wrong content type or unparsable JSON. Never retried.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A request body could not be encoded.
    #[error("Could not encode request: {0}")]
    Encode(String),

    /// The backend answered with `success: false`.
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A newer operation of the same kind started before this one finished.
    #[error("Request was superseded by a newer one")]
    Superseded,
}

impl ClientError {
    /// Whether the request client should try again after this error.
    ///
    /// Only transport failures and non-404 status codes qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Status { .. })
    }

    /// Stable machine-readable code, used in CLI output.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::WalletNotInstalled { .. } => "wallet_not_installed",
            ClientError::UserRejected { .. } => "user_rejected",
            ClientError::NoAccounts => "no_accounts",
            ClientError::NotConnected => "not_connected",
            ClientError::InvalidAddress(_) => "invalid_address",
            ClientError::Provider { .. } => "provider_error",
            ClientError::Transport(_) => "transport_error",
            ClientError::Status { .. } => "http_status",
            ClientError::NotFound(_) => "not_found",
            ClientError::MalformedResponse(_) => "malformed_response",
            ClientError::Encode(_) => "encode_error",
            ClientError::Backend(_) => "backend_error",
            ClientError::Storage(_) => "storage_error",
            ClientError::Config(_) => "config_error",
            ClientError::Superseded => "superseded",
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
