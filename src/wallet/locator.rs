// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Provider locator.
//!
//! Several extensions may inject at once, and some imitate each other's
//! flags (Coinbase Wallet historically also set `isMetaMask`). Flags are
//! checked first, exclusively; name/id matching is the fallback.

use std::sync::Arc;

use tracing::debug;

use super::kind::WalletKind;
use super::provider::{Eip1193Provider, InjectionSurface, ProviderInfo};

/// Find the provider for `kind`. `None` means "not installed".
pub fn locate(surface: &InjectionSurface, kind: &WalletKind) -> Option<Arc<dyn Eip1193Provider>> {
    let providers = surface.providers();

    let found = providers
        .iter()
        .find(|p| matches_flags(&p.info(), kind))
        .or_else(|| providers.iter().find(|p| matches_name(&p.info(), kind)))
        .cloned();

    debug!(
        wallet = %kind,
        candidates = providers.len(),
        found = found.is_some(),
        "Located wallet provider"
    );
    found
}

fn matches_flags(info: &ProviderInfo, kind: &WalletKind) -> bool {
    match kind {
        WalletKind::MetaMask => info.is_metamask && !info.is_coinbase_wallet,
        WalletKind::CoinbaseWallet => info.is_coinbase_wallet && !info.is_metamask,
        _ => false,
    }
}

fn matches_name(info: &ProviderInfo, kind: &WalletKind) -> bool {
    let tokens: Vec<String> = kind
        .match_tokens()
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return false;
    }

    [info.name.as_deref(), info.id.as_deref()]
        .into_iter()
        .flatten()
        .map(|field| field.to_ascii_lowercase().replace(' ', ""))
        .any(|field| tokens.iter().any(|token| field.contains(token.as_str())))
}
