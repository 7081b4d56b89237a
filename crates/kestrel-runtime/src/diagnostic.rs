// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The failure wire shape shared by the error and init-error endpoints.

use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;
use crate::handler::HandlerError;

/// Body posted when the loop cannot encode a diagnostic itself.
const FALLBACK_BODY: &[u8] = br#"{"errorMessage":"error could not be encoded","errorType":"Diagnostic"}"#;

/// Structured failure report understood by the control plane.
///
/// Posted to `/invocation/{id}/error` for per-invocation failures and to
/// `/init/error` for fatal ones; both endpoints expect the same shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable failure description.
    #[serde(rename = "errorMessage")]
    pub error_message: String,
    /// Failure kind label, e.g. `Validation` or `ProtocolViolation`.
    #[serde(rename = "errorType")]
    pub error_type: String,
}

impl Diagnostic {
    /// Create a diagnostic with the given kind and message.
    pub fn new(error_type: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            error_type: error_type.into(),
        }
    }

    /// Encode the diagnostic as a wire body.
    ///
    /// Total: this sits inside the failure path, so it must not introduce a
    /// failure of its own. Serde cannot fail on two plain strings, but if it
    /// ever does the static fallback body goes out instead.
    pub fn to_body(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_else(|_| FALLBACK_BODY.to_vec())
    }
}

impl From<&HandlerError> for Diagnostic {
    fn from(failure: &HandlerError) -> Self {
        Diagnostic::new(&failure.kind, &failure.message)
    }
}

impl From<&RuntimeError> for Diagnostic {
    fn from(fatal: &RuntimeError) -> Self {
        Diagnostic::new(fatal.kind(), fatal.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_uses_host_field_names() {
        let body = Diagnostic::new("Validation", "name must not be empty").to_body();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["errorMessage"], "name must not be empty");
        assert_eq!(value["errorType"], "Validation");
    }

    #[test]
    fn encoding_is_total_for_awkward_messages() {
        for message in ["", "quote \" backslash \\", "newline\nand\ttab", "null\0byte"] {
            let body = Diagnostic::new("Unhandled", message).to_body();
            let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(value["errorMessage"], message);
        }
    }

    #[test]
    fn fallback_body_is_itself_valid_json() {
        let value: serde_json::Value = serde_json::from_slice(FALLBACK_BODY).unwrap();
        assert_eq!(value["errorType"], "Diagnostic");
    }

    #[test]
    fn from_runtime_error_carries_kind_label() {
        let fatal = RuntimeError::protocol("invocation body is empty");
        let diagnostic = Diagnostic::from(&fatal);

        assert_eq!(diagnostic.error_type, "ProtocolViolation");
        assert!(diagnostic.error_message.contains("invocation body is empty"));
    }

    #[test]
    fn from_handler_error_carries_kind() {
        let failure = HandlerError::validation("name must not be empty");
        let diagnostic = Diagnostic::from(&failure);

        assert_eq!(diagnostic.error_type, "Validation");
        assert_eq!(diagnostic.error_message, "name must not be empty");
    }
}
