// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Client Data Models
//!
//! Wire types exchanged with the gift-card backend and the persisted
//! [`Session`]. JSON field names are camelCase to match the backend.
//!
//! ## Wallet Address Type
//!
//! [`WalletAddress`] wraps an Ethereum-style address (0x-prefixed, 40 hex
//! characters). Parsing validates the format with `alloy`; the caller's
//! textual form is kept so it round-trips to storage and URLs unchanged.

use std::str::FromStr;

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

// =============================================================================
// Wallet Address Type
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Validate and wrap an address string.
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        let trimmed = raw.trim();
        if !trimmed.starts_with("0x") {
            return Err(ClientError::InvalidAddress(raw.to_string()));
        }
        Address::from_str(trimmed).map_err(|_| ClientError::InvalidAddress(raw.to_string()))?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// EIP-55 checksummed form, for display.
    pub fn checksummed(&self) -> String {
        Address::from_str(&self.0)
            .map(|a| a.to_checksum(None))
            .unwrap_or_else(|_| self.0.clone())
    }

    /// Case-insensitive comparison; wallets report mixed-case addresses.
    pub fn same_as(&self, other: &WalletAddress) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WalletAddress {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Session
// =============================================================================

/// The persisted login state. Both fields are present or both are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub wallet_address: Option<WalletAddress>,
    pub token: Option<String>,
}

impl Session {
    pub fn connected(wallet_address: WalletAddress, token: String) -> Self {
        Self {
            wallet_address: Some(wallet_address),
            token: Some(token),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.wallet_address.is_some() && self.token.is_some()
    }
}

// =============================================================================
// Profile Models
// =============================================================================

/// Aggregate counters shown on the profile screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub cards_created: u64,
    pub cards_claimed: u64,
    pub cards_sent: u64,
    pub cards_received: u64,
    /// Total value moved through gift cards, as a decimal string.
    pub total_value: String,
}

impl UserStats {
    pub fn zero() -> Self {
        Self {
            total_value: "0".to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub wallet_address: WalletAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default = "UserStats::zero")]
    pub stats: UserStats,
}

impl UserProfile {
    /// Profile with no details and all-zero stats.
    pub fn empty(wallet_address: WalletAddress) -> Self {
        Self {
            wallet_address,
            username: None,
            bio: None,
            avatar_url: None,
            stats: UserStats::zero(),
        }
    }
}

/// Request body for `PUT /users/{address}/profile`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(username) = &self.username {
            profile.username = Some(username.clone());
        }
        if let Some(bio) = &self.bio {
            profile.bio = Some(bio.clone());
        }
        if let Some(avatar_url) = &self.avatar_url {
            profile.avatar_url = Some(avatar_url.clone());
        }
    }
}

// =============================================================================
// Gift Card Models
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GiftCardStatus {
    Active,
    Pending,
    Claimed,
    Transferred,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftCard {
    pub id: String,
    /// On-chain token id once minted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    pub amount: String,
    pub currency: String,
    pub status: GiftCardStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<WalletAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<WalletAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub has_secret: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGiftCardRequest {
    pub amount: String,
    pub currency: String,
    pub sender: WalletAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<WalletAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimGiftCardRequest {
    pub wallet_address: WalletAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferGiftCardRequest {
    pub from: WalletAddress,
    pub to: WalletAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSecretRequest {
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretStatus {
    pub gift_card_id: String,
    pub secret_set: bool,
}

// =============================================================================
// Activity Models
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Created,
    Claimed,
    Transferred,
    Received,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub kind: ActivityKind,
    pub gift_card_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<WalletAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Everything the home screen renders for one wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub profile: UserProfile,
    pub inventory: Vec<GiftCard>,
    pub activity: Vec<Activity>,
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request body for `POST /auth/wallet`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAuthRequest<'a> {
    pub wallet_address: &'a WalletAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletAuthResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x742d35cc6634c0532925a3b844bc9e7595f4ab12";

    #[test]
    fn wallet_address_accepts_valid_hex() {
        let addr = WalletAddress::parse(ADDR).unwrap();
        assert_eq!(addr.as_str(), ADDR);
        assert_eq!(addr.to_string(), ADDR);
    }

    #[test]
    fn wallet_address_trims_whitespace() {
        let addr = WalletAddress::parse(&format!("  {ADDR}\n")).unwrap();
        assert_eq!(addr.as_str(), ADDR);
    }

    #[test]
    fn wallet_address_rejects_garbage() {
        for bad in [
            "",
            "0x",
            "0x1234",
            "742d35cc6634c0532925a3b844bc9e7595f4ab12",
            "0xzz2d35cc6634c0532925a3b844bc9e7595f4ab12",
        ] {
            assert!(
                matches!(WalletAddress::parse(bad), Err(ClientError::InvalidAddress(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn wallet_address_compares_case_insensitively() {
        let lower = WalletAddress::parse(ADDR).unwrap();
        let upper = WalletAddress::parse(&ADDR.to_uppercase().replacen("0X", "0x", 1)).unwrap();
        assert!(lower.same_as(&upper));
        assert_ne!(lower, upper);
    }

    #[test]
    fn checksummed_address_mixes_case() {
        let addr = WalletAddress::parse(ADDR).unwrap();
        let checksummed = addr.checksummed();
        assert!(checksummed.eq_ignore_ascii_case(ADDR));
        assert_ne!(checksummed, ADDR);
    }

    #[test]
    fn wallet_address_deserialization_validates() {
        let ok: Result<WalletAddress, _> = serde_json::from_str(&format!("\"{ADDR}\""));
        assert!(ok.is_ok());
        let bad: Result<WalletAddress, _> = serde_json::from_str("\"0xnope\"");
        assert!(bad.is_err());
    }

    #[test]
    fn empty_profile_serializes_with_zero_stats() {
        let profile = UserProfile::empty(WalletAddress::parse(ADDR).unwrap());
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["walletAddress"], ADDR);
        assert_eq!(json["stats"]["cardsCreated"], 0);
        assert_eq!(json["stats"]["cardsClaimed"], 0);
        assert_eq!(json["stats"]["totalValue"], "0");
        assert!(json.get("username").is_none());
    }

    #[test]
    fn profile_without_stats_deserializes_to_zero() {
        let profile: UserProfile =
            serde_json::from_str(&format!(r#"{{"walletAddress":"{ADDR}","username":"ada"}}"#))
                .unwrap();
        assert_eq!(profile.stats, UserStats::zero());
        assert_eq!(profile.username.as_deref(), Some("ada"));
    }

    #[test]
    fn profile_update_only_touches_present_fields() {
        let mut profile = UserProfile::empty(WalletAddress::parse(ADDR).unwrap());
        profile.bio = Some("old bio".to_string());

        let update = ProfileUpdate {
            username: Some("ada".to_string()),
            ..ProfileUpdate::default()
        };
        update.apply_to(&mut profile);

        assert_eq!(profile.username.as_deref(), Some("ada"));
        assert_eq!(profile.bio.as_deref(), Some("old bio"));
    }

    #[test]
    fn gift_card_status_uses_lowercase_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&GiftCardStatus::Transferred).unwrap(),
            "\"transferred\""
        );
        let status: GiftCardStatus = serde_json::from_str("\"claimed\"").unwrap();
        assert_eq!(status, GiftCardStatus::Claimed);
    }

    #[test]
    fn session_connected_requires_both_fields() {
        assert!(!Session::default().is_connected());
        let session = Session::connected(WalletAddress::parse(ADDR).unwrap(), "tok".to_string());
        assert!(session.is_connected());
    }
}
