// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-invocation context derived from poll response headers.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;

use crate::error::{Result, RuntimeError};

/// Header carrying the request id of the current work item.
pub const HEADER_REQUEST_ID: &str = "Kestrel-Request-Id";
/// Header carrying the invocation deadline as epoch milliseconds.
pub const HEADER_DEADLINE_MS: &str = "Kestrel-Deadline-Ms";
/// Header carrying the trace id propagated from the caller.
pub const HEADER_TRACE_ID: &str = "Kestrel-Trace-Id";

/// Metadata describing one unit of work.
///
/// Constructed once per loop iteration from the poll response headers and
/// never mutated afterwards; it is scoped to exactly that iteration and is
/// dropped with it. The deadline is informational only - the loop does not
/// enforce it, a handler that cares must check it itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    /// Unique id of this invocation; every response and error post targets it.
    pub request_id: String,
    /// When the control plane will give up on this invocation, if announced.
    pub deadline: Option<DateTime<Utc>>,
    /// Trace id for the caller's tracing system, passed through untouched.
    pub trace_id: Option<String>,
}

impl InvocationContext {
    /// Derive a context from poll response headers.
    ///
    /// A missing or empty request id is a protocol violation: the control
    /// plane handed out a work item that cannot be answered.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let request_id = header_str(headers, HEADER_REQUEST_ID)
            .map(str::trim)
            .unwrap_or_default();
        if request_id.is_empty() {
            return Err(RuntimeError::protocol(format!(
                "{HEADER_REQUEST_ID} header is missing or empty"
            )));
        }

        let deadline = header_str(headers, HEADER_DEADLINE_MS)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis);

        let trace_id = header_str(headers, HEADER_TRACE_ID)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(Self {
            request_id: request_id.to_string(),
            deadline,
            trace_id,
        })
    }

    /// Build a context from a bare request id.
    pub fn of_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            deadline: None,
            trace_id: None,
        }
    }

    /// Time left until the deadline, if one was announced.
    ///
    /// Negative durations are clamped to zero.
    pub fn remaining_time(&self) -> Option<std::time::Duration> {
        self.deadline.map(|deadline| {
            (deadline - Utc::now())
                .to_std()
                .unwrap_or(std::time::Duration::ZERO)
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
