// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Runtime-fatal error types.
//!
//! Everything in [`RuntimeError`] terminates the invocation loop. Failures
//! raised by function code during a single invocation are a different tier
//! entirely and are carried by `HandlerError` instead.

use thiserror::Error;

/// Errors that terminate the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration error (missing or invalid environment variable)
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure talking to the control plane
    #[error("control plane transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The control plane violated the invocation protocol
    /// (non-success poll status, empty body, missing request id)
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// Handler construction failed during bootstrap
    #[error("initialization failed: {0}")]
    Init(String),
}

impl RuntimeError {
    /// Shorthand for a bootstrap failure.
    pub fn init(message: impl Into<String>) -> Self {
        RuntimeError::Init(message.into())
    }

    /// Shorthand for a protocol violation.
    pub fn protocol(message: impl Into<String>) -> Self {
        RuntimeError::Protocol(message.into())
    }

    /// Label used as the wire `errorType` when this error is reported.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::Config(_) => "ConfigError",
            RuntimeError::Http(_) => "HttpError",
            RuntimeError::Protocol(_) => "ProtocolViolation",
            RuntimeError::Init(_) => "InitError",
        }
    }
}

/// Type alias for runtime results.
pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(RuntimeError::Config("x".into()).kind(), "ConfigError");
        assert_eq!(RuntimeError::protocol("x").kind(), "ProtocolViolation");
        assert_eq!(RuntimeError::init("x").kind(), "InitError");
    }

    #[test]
    fn display_includes_message() {
        let err = RuntimeError::protocol("invocation body is empty");
        assert_eq!(
            err.to_string(),
            "protocol violation: invocation body is empty"
        );
    }
}
