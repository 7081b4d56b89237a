// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Runtime configuration loaded from the process environment.

use std::env;

use crate::error::{Result, RuntimeError};

/// Environment variable carrying the control-plane base address.
pub const RUNTIME_API_VAR: &str = "KESTREL_RUNTIME_API";

/// Runtime configuration.
///
/// The only required setting is the control-plane base address: a process
/// started outside a Kestrel environment has nowhere to poll and must not
/// start at all.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Control-plane base address, scheme included, no trailing slash
    pub api_base: String,
    /// Connection timeout in milliseconds (default: 10_000)
    pub connect_timeout_ms: u64,
    /// Timeout for response/error posts in milliseconds (default: 30_000).
    /// Never applied to the invocation poll, which long-polls unbounded.
    pub post_timeout_ms: u64,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `KESTREL_RUNTIME_API` - control-plane base address (`host:port` or
    ///   a full URL; `http://` is assumed when no scheme is given)
    ///
    /// # Optional Environment Variables
    /// - `KESTREL_CONNECT_TIMEOUT_MS` - connection timeout (default: 10000)
    /// - `KESTREL_POST_TIMEOUT_MS` - response/error post timeout (default: 30000)
    pub fn from_env() -> Result<Self> {
        let api = env::var(RUNTIME_API_VAR).unwrap_or_default();
        if api.trim().is_empty() {
            return Err(RuntimeError::Config(format!(
                "{RUNTIME_API_VAR} is required; the runtime can only run inside a Kestrel environment"
            )));
        }

        let connect_timeout_ms = env::var("KESTREL_CONNECT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        let post_timeout_ms = env::var("KESTREL_POST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30_000);

        Ok(Self {
            api_base: normalize_base(&api),
            connect_timeout_ms,
            post_timeout_ms,
        })
    }

    /// Create a configuration for the given control-plane address.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: normalize_base(&api_base.into()),
            connect_timeout_ms: 10_000,
            post_timeout_ms: 30_000,
        }
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.connect_timeout_ms = timeout_ms;
        self
    }

    /// Set the response/error post timeout.
    pub fn with_post_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.post_timeout_ms = timeout_ms;
        self
    }
}

/// The control plane hands out a bare `host:port`; URLs are accepted too.
fn normalize_base(addr: &str) -> String {
    let addr = addr.trim();
    let with_scheme = if addr.starts_with("http://") || addr.starts_with("https://") {
        addr.to_string()
    } else {
        format!("http://{addr}")
    };
    with_scheme.trim_end_matches('/').to_string()
}
