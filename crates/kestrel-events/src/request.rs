// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Inbound gateway request envelope.

use std::collections::HashMap;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The gateway failed to decode a base64-encoded request body.
#[derive(Debug, Error)]
#[error("invalid base64 request body: {0}")]
pub struct BodyDecodeError(#[from] base64::DecodeError);

/// Request envelope delivered by an HTTP gateway.
///
/// Every field is optional on the wire; an envelope with nothing but a body
/// is valid. Binary payloads arrive base64-encoded with `isBase64Encoded`
/// set, text payloads arrive verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayRequest {
    /// HTTP method of the original gateway call.
    pub http_method: String,
    /// Request path as seen by the gateway.
    pub path: String,
    /// Request headers, first value per name.
    pub headers: HashMap<String, String>,
    /// Query string parameters.
    pub query_string_parameters: HashMap<String, String>,
    /// Raw request body, base64-encoded when `is_base64_encoded` is set.
    pub body: Option<String>,
    /// Whether `body` is base64-encoded binary data.
    pub is_base64_encoded: bool,
}

impl GatewayRequest {
    /// Create an envelope for the given method and path.
    pub fn new(http_method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the request body as plain text.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = false;
        self
    }

    /// Set the request body from raw bytes, base64-encoding them.
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

    /// Look up a header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Return the request body as raw bytes, decoding base64 when flagged.
    ///
    /// Returns `None` when the envelope carries no body at all.
    pub fn body_bytes(&self) -> Result<Option<Vec<u8>>, BodyDecodeError> {
        match &self.body {
            None => Ok(None),
            Some(body) if self.is_base64_encoded => {
                let decoded = general_purpose::STANDARD.decode(body.as_bytes())?;
                Ok(Some(decoded))
            }
            Some(body) => Ok(Some(body.as_bytes().to_vec())),
        }
    }
}
