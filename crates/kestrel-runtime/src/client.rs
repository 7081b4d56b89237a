// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP client for the control-plane invocation API.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::config::RuntimeConfig;
use crate::context::InvocationContext;
use crate::diagnostic::Diagnostic;
use crate::error::{Result, RuntimeError};

/// One unit of work fetched from the poll endpoint.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Raw payload bytes, handed to the handler untouched.
    pub payload: Vec<u8>,
    /// Metadata describing this work item.
    pub context: InvocationContext,
}

/// Client for the four control-plane endpoints.
///
/// The endpoint set is derived once from the configured base address and is
/// immutable for the process lifetime:
///
/// - `GET  {base}/invocation/next`
/// - `POST {base}/invocation/{request_id}/response`
/// - `POST {base}/invocation/{request_id}/error`
/// - `POST {base}/init/error`
#[derive(Debug, Clone)]
pub struct RuntimeApiClient {
    http: reqwest::Client,
    api_base: String,
    // Fixed endpoints, derived once for the process lifetime
    next_uri: String,
    init_error_uri: String,
    post_timeout: Duration,
}

impl RuntimeApiClient {
    /// Build a client for the configured control plane.
    ///
    /// The underlying HTTP client carries a connect timeout but no total
    /// request timeout: the poll call blocks server-side until work arrives.
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()?;

        Ok(Self {
            http,
            next_uri: format!("{}/invocation/next", config.api_base),
            init_error_uri: format!("{}/init/error", config.api_base),
            api_base: config.api_base.clone(),
            post_timeout: Duration::from_millis(config.post_timeout_ms),
        })
    }

    /// The control-plane base address this client talks to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn response_uri(&self, request_id: &str) -> String {
        format!("{}/invocation/{request_id}/response", self.api_base)
    }

    fn error_uri(&self, request_id: &str) -> String {
        format!("{}/invocation/{request_id}/error", self.api_base)
    }

    /// Long-poll the control plane for the next work item.
    ///
    /// Blocks until the control plane hands one out. A non-success status,
    /// an empty body, or an unanswerable work item (no request id) means the
    /// control plane itself is unusable, so all of these are fatal rather
    /// than per-iteration errors.
    pub async fn next_invocation(&self) -> Result<Invocation> {
        let response = self.http.get(&self.next_uri).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RuntimeError::protocol(format!(
                "poll returned status {status}"
            )));
        }

        let headers = response.headers().clone();
        let payload = response.bytes().await?;
        if payload.is_empty() {
            return Err(RuntimeError::protocol("invocation body is empty"));
        }

        let context = InvocationContext::from_headers(&headers)?;
        debug!(request_id = %context.request_id, bytes = payload.len(), "work item fetched");

        Ok(Invocation {
            payload: payload.to_vec(),
            context,
        })
    }

    /// Post a successful invocation result.
    ///
    /// The post is issued synchronously but the outcome is best-effort: the
    /// caller logs a failure and moves on to the next fetch.
    pub async fn post_response(&self, request_id: &str, body: Vec<u8>) -> Result<()> {
        let response = self
            .http
            .post(self.response_uri(request_id))
            .timeout(self.post_timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        debug!(request_id, status = %response.status(), "invocation response delivered");
        Ok(())
    }

    /// Post a per-invocation failure. Fire-and-forget.
    pub async fn post_error(&self, request_id: &str, diagnostic: &Diagnostic) {
        let outcome = self
            .http
            .post(self.error_uri(request_id))
            .timeout(self.post_timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(diagnostic.to_body())
            .send()
            .await;

        match outcome {
            Ok(response) => {
                debug!(request_id, status = %response.status(), "invocation error delivered");
            }
            Err(e) => warn!(request_id, error = %e, "failed to deliver invocation error"),
        }
    }

    /// Post an initialization failure. Fire-and-forget.
    ///
    /// There is no endpoint to report a reporting failure to, so a failure
    /// here is logged and swallowed.
    pub async fn post_init_error(&self, diagnostic: &Diagnostic) {
        let outcome = self
            .http
            .post(&self.init_error_uri)
            .timeout(self.post_timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(diagnostic.to_body())
            .send()
            .await;

        match outcome {
            Ok(response) => {
                debug!(status = %response.status(), "init error delivered");
            }
            Err(e) => warn!(error = %e, "failed to deliver init error"),
        }
    }
}
