// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gift-card client core.
//!
//! Wallet connection through EIP-1193 providers, a persisted two-key session,
//! and a retrying REST client for the gift-card backend.
//!
//! ## Modules
//!
//! - `wallet` - provider detection, connect flow, provider events
//! - `session` - session store and credential issuing
//! - `storage` - key/value session storage (redb or in-memory)
//! - `http` - retrying request client
//! - `api` - typed gift-card operations with fallback handling
//! - `config` - environment configuration
//! - `logging` - tracing subscriber setup

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod session;
pub mod storage;
pub mod wallet;

pub use error::{ClientError, ClientResult};
