// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer credential issuance.

use base64ct::{Base64UrlUnpadded, Encoding};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{ClientError, ClientResult};
use crate::http::RequestClient;
use crate::models::{WalletAddress, WalletAuthRequest, WalletAuthResponse};

const DERIVED_TOKEN_PREFIX: &str = "wallet_";

pub enum CredentialIssuer {
    /// Deterministic token from the address. Backends that trust the
    /// connected address accept it as-is.
    Derived,
    /// Exchange the address (and optional signature) for a token at
    /// `POST /auth/wallet`.
    Backend(RequestClient),
}

impl CredentialIssuer {
    pub async fn issue(
        &self,
        address: &WalletAddress,
        signature: Option<&SignedMessage>,
    ) -> ClientResult<String> {
        match self {
            CredentialIssuer::Derived => Ok(derive_token(address)),
            CredentialIssuer::Backend(client) => {
                let request = WalletAuthRequest {
                    wallet_address: address,
                    signature: signature.map(|s| s.signature.as_str()),
                    message: signature.map(|s| s.message.as_str()),
                };
                let response: WalletAuthResponse = client.post_json("/auth/wallet", &request).await?;
                if response.token.trim().is_empty() {
                    return Err(ClientError::Backend(
                        "auth response did not include a token".to_string(),
                    ));
                }
                info!(wallet = %address, "Obtained backend credential");
                Ok(response.token)
            }
        }
    }
}

impl std::fmt::Debug for CredentialIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialIssuer::Derived => f.write_str("Derived"),
            CredentialIssuer::Backend(client) => f.debug_tuple("Backend").field(client).finish(),
        }
    }
}

/// A sign-in message and the wallet's `personal_sign` signature over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage {
    pub message: String,
    pub signature: String,
}

/// `wallet_` + base64url(SHA-256(lowercase address)).
pub fn derive_token(address: &WalletAddress) -> String {
    let digest = Sha256::digest(address.as_str().to_ascii_lowercase().as_bytes());
    format!("{DERIVED_TOKEN_PREFIX}{}", Base64UrlUnpadded::encode_string(&digest))
}
