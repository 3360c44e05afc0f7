// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Module
//!
//! Detection of injected wallet providers and the connect flow.
//!
//! ## Submodules
//!
//! - `provider` - EIP-1193 boundary types
//! - `kind` - supported wallet families and install links
//! - `locator` - picks a provider out of the injection surface
//! - `connector` - account authorization, session hand-off, event listeners
//! - `host` - open-tab / reload actions
//! - `rpc` - provider over HTTP JSON-RPC for desktop wallets

pub mod connector;
pub mod host;
pub mod kind;
pub mod locator;
pub mod provider;
pub mod rpc;

#[cfg(test)]
pub(crate) mod test_support;

pub use connector::{Connection, WalletConnector};
pub use host::{BrowserHost, RecordingHost, TerminalHost};
pub use kind::WalletKind;
pub use locator::locate;
pub use provider::{
    Eip1193Provider, InjectionSurface, ProviderEvent, ProviderInfo, ProviderListener,
    ProviderRpcError, USER_REJECTED_CODE,
};
pub use rpc::RpcProvider;
