// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Event handler contract and its adaptation variants.
//!
//! The invocation loop only ever sees [`EventHandler`]: raw payload plus
//! context in, wire bytes or a [`HandlerError`] out. How the payload maps
//! onto the user's [`Function`](crate::Function) is the business of the
//! variant bound at bootstrap:
//!
//! - [`InputEventHandler`]: the payload is the function input, verbatim
//! - [`GatewayEventHandler`]: the payload is an HTTP gateway envelope whose
//!   body carries the function input

mod gateway;
mod input;

pub use gateway::GatewayEventHandler;
pub use input::InputEventHandler;

use async_trait::async_trait;
use thiserror::Error;

use crate::context::InvocationContext;
use crate::function::Function;

/// A failure raised while dispatching one invocation.
///
/// This is a value, not an escape mechanism: the loop pattern-matches on
/// the handler outcome, converts failures to the wire diagnostic shape, and
/// carries on with the next work item. The `kind` becomes the wire
/// `errorType`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct HandlerError {
    /// Failure kind label, e.g. [`HandlerError::VALIDATION`].
    pub kind: String,
    /// Human-readable failure description.
    pub message: String,
}

impl HandlerError {
    /// The caller's input was rejected.
    pub const VALIDATION: &'static str = "Validation";
    /// The caller is not allowed to perform the operation.
    pub const UNAUTHORIZED: &'static str = "Unauthorized";
    /// The addressed entity does not exist.
    pub const NOT_FOUND: &'static str = "NotFound";
    /// The operation gave up waiting on a dependency.
    pub const TIMEOUT: &'static str = "Timeout";
    /// A payload could not be encoded or decoded.
    pub const SERIALIZATION: &'static str = "Serialization";
    /// Anything the function did not classify.
    pub const UNHANDLED: &'static str = "Unhandled";

    /// Create a failure with an arbitrary kind label.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// A [`HandlerError::VALIDATION`] failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(Self::VALIDATION, message)
    }

    /// A [`HandlerError::UNAUTHORIZED`] failure.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(Self::UNAUTHORIZED, message)
    }

    /// A [`HandlerError::NOT_FOUND`] failure.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Self::NOT_FOUND, message)
    }

    /// A [`HandlerError::TIMEOUT`] failure.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(Self::TIMEOUT, message)
    }

    /// A [`HandlerError::SERIALIZATION`] failure.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(Self::SERIALIZATION, message)
    }

    /// An [`HandlerError::UNHANDLED`] failure.
    pub fn unhandled(message: impl Into<String>) -> Self {
        Self::new(Self::UNHANDLED, message)
    }
}

/// The contract the invocation loop dispatches through.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process one raw payload, returning the wire bytes to post back.
    async fn handle(
        &self,
        event: &[u8],
        ctx: &InvocationContext,
    ) -> Result<Vec<u8>, HandlerError>;
}

#[async_trait]
impl<H: EventHandler + ?Sized> EventHandler for Box<H> {
    async fn handle(
        &self,
        event: &[u8],
        ctx: &InvocationContext,
    ) -> Result<Vec<u8>, HandlerError> {
        (**self).handle(event, ctx).await
    }
}

/// The closed set of handler variants.
///
/// Which variant serves a process is decided exactly once, at bootstrap,
/// by this tag; the loop never consults it per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Pass the raw payload through to the function unchanged.
    InputEvent,
    /// Unwrap a gateway envelope around the function input and rewrap the
    /// output in a status-coded response envelope.
    GatewayEvent,
}

impl HandlerKind {
    /// Stable tag naming this variant in configuration and logs.
    pub fn qualifier(&self) -> &'static str {
        match self {
            HandlerKind::InputEvent => "input-event",
            HandlerKind::GatewayEvent => "gateway-event",
        }
    }
}

/// Bind a function to the handler variant selected by `kind`.
pub fn bind<F>(kind: HandlerKind, function: F) -> Box<dyn EventHandler>
where
    F: Function + 'static,
{
    match kind {
        HandlerKind::InputEvent => Box::new(InputEventHandler::new(function)),
        HandlerKind::GatewayEvent => Box::new(GatewayEventHandler::new(function)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind_labels() {
        assert_eq!(HandlerError::validation("x").kind, "Validation");
        assert_eq!(HandlerError::not_found("x").kind, "NotFound");
        assert_eq!(HandlerError::unhandled("x").kind, "Unhandled");
    }

    #[test]
    fn display_combines_kind_and_message() {
        let failure = HandlerError::timeout("inventory lookup exceeded 5s");
        assert_eq!(failure.to_string(), "Timeout: inventory lookup exceeded 5s");
    }

    #[test]
    fn qualifiers_are_stable() {
        assert_eq!(HandlerKind::InputEvent.qualifier(), "input-event");
        assert_eq!(HandlerKind::GatewayEvent.qualifier(), "gateway-event");
    }
}
