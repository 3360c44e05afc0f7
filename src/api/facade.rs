// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed gift-card API.
//!
//! ## Endpoints
//!
//! | Operation | Method & path |
//! |-----------|---------------|
//! | profile | `GET /users/{address}/profile` |
//! | update profile | `PUT /users/{address}/profile` |
//! | inventory | `GET /users/{address}/inventory` |
//! | activity | `GET /users/{address}/activity` |
//! | create | `POST /giftcards` |
//! | claim | `POST /giftcards/{id}/claim` |
//! | transfer | `POST /giftcards/{id}/transfer` |
//! | secret | `POST /giftcards/{id}/secret` |

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use super::generation::RequestGeneration;
use super::outcome::{ApiOutcome, FallbackPolicy};
use crate::error::ClientResult;
use crate::http::RequestClient;
use crate::models::{
    Activity, ClaimGiftCardRequest, CreateGiftCardRequest, Dashboard, GiftCard, GiftCardStatus,
    ProfileUpdate, SecretStatus, SetSecretRequest, TransferGiftCardRequest, UserProfile,
    WalletAddress,
};

/// Prefix for ids of gift cards synthesized while the backend is unreachable.
pub const LOCAL_CARD_PREFIX: &str = "local-";

pub struct GiftCardApi {
    client: RequestClient,
    fallback: FallbackPolicy,
    dashboard_generation: RequestGeneration,
}

impl GiftCardApi {
    pub fn new(client: RequestClient, fallback: FallbackPolicy) -> Self {
        Self {
            client,
            fallback,
            dashboard_generation: RequestGeneration::new(),
        }
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub async fn profile(&self, address: &WalletAddress) -> ApiOutcome<UserProfile> {
        let result = self.fetch_profile(address).await;
        self.settle("profile", result, || UserProfile::empty(address.clone()))
    }

    pub async fn update_profile(
        &self,
        address: &WalletAddress,
        update: &ProfileUpdate,
    ) -> ApiOutcome<UserProfile> {
        let result = self
            .client
            .put_json(&format!("/users/{address}/profile"), update)
            .await;
        self.settle("update_profile", result, || {
            let mut profile = UserProfile::empty(address.clone());
            update.apply_to(&mut profile);
            profile
        })
    }

    // =========================================================================
    // Inventory & Activity
    // =========================================================================

    pub async fn inventory(&self, address: &WalletAddress) -> ApiOutcome<Vec<GiftCard>> {
        let result = self.fetch_inventory(address).await;
        self.settle("inventory", result, Vec::new)
    }

    pub async fn activity(&self, address: &WalletAddress) -> ApiOutcome<Vec<Activity>> {
        let result = self.fetch_activity(address).await;
        self.settle("activity", result, Vec::new)
    }

    /// Profile, inventory and activity fetched together. The first failure
    /// aborts the whole load; no placeholder data is substituted.
    ///
    /// Starting a new dashboard load supersedes one still in flight.
    pub async fn dashboard(&self, address: &WalletAddress) -> ClientResult<Dashboard> {
        let ticket = self.dashboard_generation.begin();
        self.dashboard_generation
            .run(&ticket, async {
                let (profile, inventory, activity) = tokio::try_join!(
                    self.fetch_profile(address),
                    self.fetch_inventory(address),
                    self.fetch_activity(address),
                )?;
                Ok(Dashboard {
                    profile,
                    inventory,
                    activity,
                })
            })
            .await
    }

    // =========================================================================
    // Gift Cards
    // =========================================================================

    pub async fn create_gift_card(&self, request: &CreateGiftCardRequest) -> ApiOutcome<GiftCard> {
        let result = self.client.post_json("/giftcards", request).await;
        self.settle("create_gift_card", result, || GiftCard {
            id: format!("{LOCAL_CARD_PREFIX}{}", Uuid::new_v4()),
            token_id: None,
            amount: request.amount.clone(),
            currency: request.currency.clone(),
            status: GiftCardStatus::Pending,
            sender: Some(request.sender.clone()),
            recipient: request.recipient.clone(),
            message: request.message.clone(),
            has_secret: request.secret.is_some(),
            created_at: Utc::now(),
        })
    }

    pub async fn claim_gift_card(
        &self,
        id: &str,
        request: &ClaimGiftCardRequest,
    ) -> ApiOutcome<GiftCard> {
        let result = self
            .client
            .post_json(&format!("/giftcards/{}/claim", path_segment(id)), request)
            .await;
        self.settle("claim_gift_card", result, || {
            placeholder_card(id, GiftCardStatus::Claimed, Some(request.wallet_address.clone()))
        })
    }

    pub async fn transfer_gift_card(
        &self,
        id: &str,
        request: &TransferGiftCardRequest,
    ) -> ApiOutcome<GiftCard> {
        let result = self
            .client
            .post_json(&format!("/giftcards/{}/transfer", path_segment(id)), request)
            .await;
        self.settle("transfer_gift_card", result, || {
            let mut card =
                placeholder_card(id, GiftCardStatus::Transferred, Some(request.to.clone()));
            card.sender = Some(request.from.clone());
            card
        })
    }

    pub async fn set_gift_card_secret(
        &self,
        id: &str,
        request: &SetSecretRequest,
    ) -> ApiOutcome<SecretStatus> {
        let result = self
            .client
            .post_json(&format!("/giftcards/{}/secret", path_segment(id)), request)
            .await;
        self.settle("set_gift_card_secret", result, || SecretStatus {
            gift_card_id: id.to_string(),
            secret_set: false,
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn fetch_profile(&self, address: &WalletAddress) -> ClientResult<UserProfile> {
        self.client
            .get_json(&format!("/users/{address}/profile"))
            .await
    }

    async fn fetch_inventory(&self, address: &WalletAddress) -> ClientResult<Vec<GiftCard>> {
        self.client
            .get_json(&format!("/users/{address}/inventory"))
            .await
    }

    async fn fetch_activity(&self, address: &WalletAddress) -> ClientResult<Vec<Activity>> {
        self.client
            .get_json(&format!("/users/{address}/activity"))
            .await
    }

    /// Map a backend result through the fallback policy.
    ///
    /// Under `Placeholder` every failure is degraded, including an explicit
    /// `success: false` rejection of a write: the caller gets synthesized data
    /// and must check `is_degraded()` (or the envelope's `warning`) to learn
    /// the write did not happen. `Strict` surfaces the rejection as `Failed`.
    fn settle<T>(
        &self,
        operation: &'static str,
        result: ClientResult<T>,
        placeholder: impl FnOnce() -> T,
    ) -> ApiOutcome<T> {
        match (result, self.fallback) {
            (Ok(data), _) => ApiOutcome::Success(data),
            (Err(reason), FallbackPolicy::Placeholder) => {
                warn!(
                    operation,
                    error = %reason,
                    code = reason.error_code(),
                    "Backend call failed; substituting placeholder data"
                );
                ApiOutcome::Degraded {
                    data: placeholder(),
                    reason,
                }
            }
            (Err(reason), FallbackPolicy::Strict) => {
                warn!(operation, error = %reason, "Backend call failed");
                ApiOutcome::Failed(reason)
            }
        }
    }
}

fn placeholder_card(
    id: &str,
    status: GiftCardStatus,
    recipient: Option<WalletAddress>,
) -> GiftCard {
    GiftCard {
        id: id.to_string(),
        token_id: None,
        amount: "0".to_string(),
        currency: String::new(),
        status,
        sender: None,
        recipient,
        message: None,
        has_secret: false,
        created_at: Utc::now(),
    }
}

/// Percent-encode a caller-supplied id for use as one path segment.
fn path_segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
