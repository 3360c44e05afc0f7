// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Facade results.
//!
//! [`ApiOutcome`] keeps "worked", "worked with substitute data" and "failed"
//! apart. [`ApiResponse`] is the flat `{ success, data, error, warning }`
//! envelope the UI layer consumes.

use serde::Serialize;

use crate::error::ClientError;

/// What the facade does with a failed backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Substitute placeholder data and report the call as degraded.
    Placeholder,
    /// Report the failure.
    Strict,
}

impl FallbackPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Some(FallbackPolicy::Placeholder),
            "strict" => Some(FallbackPolicy::Strict),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ApiOutcome<T> {
    Success(T),
    /// The backend call failed; `data` is synthesized.
    Degraded { data: T, reason: ClientError },
    Failed(ClientError),
}

impl<T> ApiOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ApiOutcome::Degraded { .. })
    }

    /// The data, real or substituted.
    pub fn data(&self) -> Option<&T> {
        match self {
            ApiOutcome::Success(data) | ApiOutcome::Degraded { data, .. } => Some(data),
            ApiOutcome::Failed(_) => None,
        }
    }

    /// Real data only; degraded results count as errors.
    pub fn into_result(self) -> Result<T, ClientError> {
        match self {
            ApiOutcome::Success(data) => Ok(data),
            ApiOutcome::Degraded { reason, .. } | ApiOutcome::Failed(reason) => Err(reason),
        }
    }

    /// Flatten into the UI envelope. Degraded results render as
    /// `success: true` with a `warning`.
    pub fn into_envelope(self) -> ApiResponse<T> {
        match self {
            ApiOutcome::Success(data) => ApiResponse {
                success: true,
                data: Some(data),
                error: None,
                warning: None,
            },
            ApiOutcome::Degraded { data, reason } => ApiResponse {
                success: true,
                data: Some(data),
                error: None,
                warning: Some(format!("Showing placeholder data: {reason}")),
            },
            ApiOutcome::Failed(error) => ApiResponse {
                success: false,
                data: None,
                error: Some(error.to_string()),
                warning: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_policy_parses() {
        assert_eq!(FallbackPolicy::parse("Placeholder"), Some(FallbackPolicy::Placeholder));
        assert_eq!(FallbackPolicy::parse(" strict "), Some(FallbackPolicy::Strict));
        assert_eq!(FallbackPolicy::parse("mock"), None);
    }

    #[test]
    fn success_envelope() {
        let envelope = ApiOutcome::Success(5).into_envelope();
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "success": true, "data": 5 })
        );
    }

    #[test]
    fn degraded_envelope_reports_success_with_warning() {
        let outcome = ApiOutcome::Degraded {
            data: vec![0u8; 0],
            reason: ClientError::Transport("connection refused".into()),
        };
        assert!(outcome.is_degraded());
        assert!(outcome.data().is_some());

        let envelope = outcome.into_envelope();
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(Vec::new()));
        assert!(envelope.warning.unwrap().contains("connection refused"));
        assert!(envelope.error.is_none());
    }

    #[test]
    fn failed_envelope_carries_error() {
        let envelope = ApiOutcome::<u8>::Failed(ClientError::Backend("nope".into())).into_envelope();
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "success": false, "error": "Backend error: nope" })
        );
    }

    #[test]
    fn degraded_is_an_error_for_strict_callers() {
        let outcome = ApiOutcome::Degraded {
            data: 1,
            reason: ClientError::NotFound("GET /x".into()),
        };
        assert!(matches!(outcome.into_result(), Err(ClientError::NotFound(_))));
        assert_eq!(ApiOutcome::Success(2).into_result().unwrap(), 2);
    }
}
