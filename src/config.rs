// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the parsed [`ClientConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GIFTCARD_API_URL` | Backend base URL | `http://localhost:3001/api` |
//! | `GIFTCARD_RETRY_ATTEMPTS` | Total attempts per request | `3` |
//! | `GIFTCARD_RETRY_DELAY_MS` | Fixed delay between attempts | `1000` |
//! | `GIFTCARD_HTTP_TIMEOUT_SECS` | Per-attempt HTTP timeout | `15` |
//! | `GIFTCARD_SESSION_DB` | Session database file | `giftcard-session.redb` |
//! | `GIFTCARD_AUTH_MODE` | `derived` or `backend` | `derived` |
//! | `GIFTCARD_FALLBACK` | `placeholder` or `strict` | `placeholder` |
//! | `GIFTCARD_SIGN_IN_MESSAGE` | Message signed on connect | unset |
//! | `WALLET_RPC_URL` | Desktop wallet JSON-RPC endpoint | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::api::FallbackPolicy;
use crate::error::{ClientError, ClientResult};
use crate::http::RetryPolicy;

pub const API_URL_ENV: &str = "GIFTCARD_API_URL";
pub const RETRY_ATTEMPTS_ENV: &str = "GIFTCARD_RETRY_ATTEMPTS";
pub const RETRY_DELAY_MS_ENV: &str = "GIFTCARD_RETRY_DELAY_MS";
pub const HTTP_TIMEOUT_SECS_ENV: &str = "GIFTCARD_HTTP_TIMEOUT_SECS";
pub const SESSION_DB_ENV: &str = "GIFTCARD_SESSION_DB";
pub const AUTH_MODE_ENV: &str = "GIFTCARD_AUTH_MODE";
pub const FALLBACK_ENV: &str = "GIFTCARD_FALLBACK";
pub const SIGN_IN_MESSAGE_ENV: &str = "GIFTCARD_SIGN_IN_MESSAGE";
pub const WALLET_RPC_URL_ENV: &str = "WALLET_RPC_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_SESSION_DB: &str = "giftcard-session.redb";

/// How the session store obtains a bearer credential on connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Deterministic token derived from the wallet address.
    Derived,
    /// Token returned by `POST /auth/wallet`.
    Backend,
}

impl AuthMode {
    pub fn parse(raw: &str) -> ClientResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "derived" => Ok(AuthMode::Derived),
            "backend" => Ok(AuthMode::Backend),
            other => Err(ClientError::Config(format!(
                "{AUTH_MODE_ENV} must be 'derived' or 'backend', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub retry: RetryPolicy,
    pub http_timeout: Duration,
    pub session_db: PathBuf,
    pub auth_mode: AuthMode,
    pub fallback: FallbackPolicy,
    pub sign_in_message: Option<String>,
    pub wallet_rpc_url: Option<Url>,
}

impl ClientConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = parse_url(API_URL_ENV, get(API_URL_ENV).as_deref().unwrap_or(DEFAULT_API_URL))?;

        let attempts = match get(RETRY_ATTEMPTS_ENV) {
            Some(raw) => parse_number::<u32>(RETRY_ATTEMPTS_ENV, &raw)?,
            None => DEFAULT_RETRY_ATTEMPTS,
        };
        if attempts == 0 {
            return Err(ClientError::Config(format!(
                "{RETRY_ATTEMPTS_ENV} must be at least 1"
            )));
        }

        let delay = match get(RETRY_DELAY_MS_ENV) {
            Some(raw) => Duration::from_millis(parse_number::<u64>(RETRY_DELAY_MS_ENV, &raw)?),
            None => DEFAULT_RETRY_DELAY,
        };

        let http_timeout = match get(HTTP_TIMEOUT_SECS_ENV) {
            Some(raw) => Duration::from_secs(parse_number::<u64>(HTTP_TIMEOUT_SECS_ENV, &raw)?),
            None => DEFAULT_HTTP_TIMEOUT,
        };

        let auth_mode = match get(AUTH_MODE_ENV) {
            Some(raw) => AuthMode::parse(&raw)?,
            None => AuthMode::Derived,
        };

        let fallback = match get(FALLBACK_ENV) {
            Some(raw) => FallbackPolicy::parse(&raw).ok_or_else(|| {
                ClientError::Config(format!(
                    "{FALLBACK_ENV} must be 'placeholder' or 'strict', got '{raw}'"
                ))
            })?,
            None => FallbackPolicy::Placeholder,
        };

        let wallet_rpc_url = get(WALLET_RPC_URL_ENV)
            .map(|raw| parse_url(WALLET_RPC_URL_ENV, &raw))
            .transpose()?;

        Ok(Self {
            api_url,
            retry: RetryPolicy::new(attempts, delay),
            http_timeout,
            session_db: PathBuf::from(get(SESSION_DB_ENV).unwrap_or_else(|| DEFAULT_SESSION_DB.to_string())),
            auth_mode,
            fallback,
            sign_in_message: get(SIGN_IN_MESSAGE_ENV),
            wallet_rpc_url,
        })
    }
}

fn parse_url(name: &str, raw: &str) -> ClientResult<Url> {
    Url::parse(raw).map_err(|e| ClientError::Config(format!("{name} is not a valid URL: {e}")))
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> ClientResult<T> {
    raw.parse()
        .map_err(|_| ClientError::Config(format!("{name} must be a non-negative integer, got '{raw}'")))
}
