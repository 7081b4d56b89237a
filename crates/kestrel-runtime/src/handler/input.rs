// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Passthrough handler variant: the payload is the function input.

use async_trait::async_trait;
use tracing::debug;

use crate::context::InvocationContext;
use crate::convert::{Converter, JsonConverter};
use crate::function::Function;
use crate::handler::{EventHandler, HandlerError};

/// Handler that feeds the raw invocation payload straight to the function.
///
/// The payload is decoded as `F::Input`, the function output is encoded
/// back to wire bytes, and that is the whole adaptation. A payload that
/// does not decode is a validation failure, an output that does not encode
/// is a serialization failure; both stay scoped to their invocation.
pub struct InputEventHandler<F, C = JsonConverter> {
    function: F,
    converter: C,
}

impl<F: Function> InputEventHandler<F> {
    /// Wrap a function with the default JSON converter.
    pub fn new(function: F) -> Self {
        Self {
            function,
            converter: JsonConverter,
        }
    }
}

impl<F: Function, C: Converter> InputEventHandler<F, C> {
    /// Wrap a function with an explicit converter.
    pub fn with_converter(function: F, converter: C) -> Self {
        Self { function, converter }
    }
}

#[async_trait]
impl<F: Function, C: Converter> EventHandler for InputEventHandler<F, C> {
    async fn handle(
        &self,
        event: &[u8],
        ctx: &InvocationContext,
    ) -> Result<Vec<u8>, HandlerError> {
        let input: F::Input = self
            .converter
            .from_wire(event)
            .map_err(|e| HandlerError::validation(format!("malformed input payload: {e}")))?;

        debug!(request_id = %ctx.request_id, "function invocation started");
        let output = self.function.invoke(input, ctx).await?;

        self.converter
            .to_wire(&output)
            .map_err(|e| HandlerError::serialization(format!("unencodable function output: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize)]
    struct Request {
        name: String,
    }

    #[derive(Serialize)]
    struct Response {
        greeting: String,
    }

    struct Greeter;

    #[async_trait]
    impl Function for Greeter {
        type Input = Request;
        type Output = Response;

        async fn invoke(
            &self,
            input: Request,
            _ctx: &InvocationContext,
        ) -> Result<Response, HandlerError> {
            if input.name.is_empty() {
                return Err(HandlerError::validation("name must not be empty"));
            }
            Ok(Response {
                greeting: format!("Hello - {}", input.name),
            })
        }
    }

    #[tokio::test]
    async fn decodes_invokes_and_encodes() {
        let handler = InputEventHandler::new(Greeter);
        let ctx = InvocationContext::of_request_id("abc123");

        let body = handler.handle(br#"{"name":"Ada"}"#, &ctx).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["greeting"], "Hello - Ada");
    }

    #[tokio::test]
    async fn function_failure_propagates_as_value() {
        let handler = InputEventHandler::new(Greeter);
        let ctx = InvocationContext::of_request_id("abc123");

        let failure = handler.handle(br#"{"name":""}"#, &ctx).await.unwrap_err();
        assert_eq!(failure.kind, HandlerError::VALIDATION);
    }

    #[tokio::test]
    async fn undecodable_payload_is_validation_failure() {
        let handler = InputEventHandler::new(Greeter);
        let ctx = InvocationContext::of_request_id("abc123");

        let failure = handler.handle(b"not json", &ctx).await.unwrap_err();
        assert_eq!(failure.kind, HandlerError::VALIDATION);
        assert!(failure.message.contains("malformed input payload"));
    }
}
