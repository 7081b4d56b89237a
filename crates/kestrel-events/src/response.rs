// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Outbound gateway response envelope.

use std::collections::HashMap;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

/// Response envelope returned to an HTTP gateway.
///
/// The gateway handler variant wraps every function outcome in one of
/// these, so upstream callers always see a status-coded HTTP response even
/// when the business logic rejected the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    /// HTTP status code presented to the gateway caller.
    pub status_code: u16,
    /// Response headers.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// Response body, base64-encoded when `is_base64_encoded` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Whether `body` is base64-encoded binary data.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl Default for GatewayResponse {
    fn default() -> Self {
        Self {
            status_code: 200,
            headers: HashMap::new(),
            body: None,
            is_base64_encoded: false,
        }
    }
}

impl GatewayResponse {
    /// A 200 response with the given text body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::default()
        }
    }

    /// An empty response with the given status code.
    pub fn status(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    /// Set the status code.
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    /// Set the response body as plain text.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = false;
        self
    }

    /// Set the response body from raw bytes, base64-encoding them.
    pub fn with_binary_body(mut self, body: &[u8]) -> Self {
        self.body = Some(general_purpose::STANDARD.encode(body));
        self.is_base64_encoded = true;
        self
    }

    /// Add a header to the envelope.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// True when the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
