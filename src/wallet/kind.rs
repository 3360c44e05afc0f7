// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supported wallet families.

use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WalletKind {
    MetaMask,
    CoinbaseWallet,
    TrustWallet,
    Rabby,
    Brave,
    /// Any other injected wallet, matched by name or id only.
    Other(String),
}

impl WalletKind {
    /// Short identifier used in the UI, CLI and name/id matching.
    pub fn id(&self) -> &str {
        match self {
            WalletKind::MetaMask => "metamask",
            WalletKind::CoinbaseWallet => "coinbase",
            WalletKind::TrustWallet => "trust",
            WalletKind::Rabby => "rabby",
            WalletKind::Brave => "brave",
            WalletKind::Other(id) => id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            WalletKind::MetaMask => "MetaMask",
            WalletKind::CoinbaseWallet => "Coinbase Wallet",
            WalletKind::TrustWallet => "Trust Wallet",
            WalletKind::Rabby => "Rabby",
            WalletKind::Brave => "Brave Wallet",
            WalletKind::Other(id) => id,
        }
    }

    /// Where to send the user when the extension is missing.
    pub fn install_url(&self) -> Option<&'static str> {
        match self {
            WalletKind::MetaMask => Some("https://metamask.io/download/"),
            WalletKind::CoinbaseWallet => Some("https://www.coinbase.com/wallet/downloads"),
            WalletKind::TrustWallet => Some("https://trustwallet.com/browser-extension"),
            WalletKind::Rabby => Some("https://rabby.io/"),
            WalletKind::Brave => Some("https://brave.com/wallet/"),
            WalletKind::Other(_) => None,
        }
    }

    /// Lowercase tokens that identify this wallet in a provider's name or id.
    pub(crate) fn match_tokens(&self) -> Vec<String> {
        let mut tokens = vec![self.id().to_ascii_lowercase()];
        let compact = self.display_name().to_ascii_lowercase().replace(' ', "");
        if !tokens.contains(&compact) {
            tokens.push(compact);
        }
        tokens
    }
}

impl FromStr for WalletKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-', '_'], "");
        Ok(match normalized.as_str() {
            "metamask" => WalletKind::MetaMask,
            "coinbase" | "coinbasewallet" => WalletKind::CoinbaseWallet,
            "trust" | "trustwallet" => WalletKind::TrustWallet,
            "rabby" => WalletKind::Rabby,
            "brave" | "bravewallet" => WalletKind::Brave,
            _ => WalletKind::Other(s.trim().to_string()),
        })
    }
}

impl std::fmt::Display for WalletKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_ids_loosely() {
        assert_eq!("metamask".parse::<WalletKind>().unwrap(), WalletKind::MetaMask);
        assert_eq!("MetaMask".parse::<WalletKind>().unwrap(), WalletKind::MetaMask);
        assert_eq!(
            "coinbase-wallet".parse::<WalletKind>().unwrap(),
            WalletKind::CoinbaseWallet
        );
        assert_eq!("Trust Wallet".parse::<WalletKind>().unwrap(), WalletKind::TrustWallet);
        assert_eq!(
            "okx".parse::<WalletKind>().unwrap(),
            WalletKind::Other("okx".to_string())
        );
    }

    #[test]
    fn known_wallets_have_install_links() {
        assert_eq!(
            WalletKind::MetaMask.install_url(),
            Some("https://metamask.io/download/")
        );
        assert!(WalletKind::CoinbaseWallet.install_url().is_some());
        assert!(WalletKind::Other("okx".to_string()).install_url().is_none());
    }

    #[test]
    fn match_tokens_include_compact_display_name() {
        assert_eq!(
            WalletKind::CoinbaseWallet.match_tokens(),
            vec!["coinbase".to_string(), "coinbasewallet".to_string()]
        );
        assert_eq!(WalletKind::MetaMask.match_tokens(), vec!["metamask".to_string()]);
    }
}
