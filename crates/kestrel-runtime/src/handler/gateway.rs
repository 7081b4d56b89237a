// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Gateway handler variant: the payload is an HTTP gateway envelope.

use async_trait::async_trait;
use kestrel_events::{GatewayRequest, GatewayResponse};
use tracing::debug;

use crate::context::InvocationContext;
use crate::convert::{Converter, JsonConverter};
use crate::diagnostic::Diagnostic;
use crate::function::Function;
use crate::handler::{EventHandler, HandlerError};

/// Handler for functions fronted by an HTTP gateway.
///
/// The invocation payload is a [`GatewayRequest`] whose body carries the
/// function input; the function output is rewrapped in a [`GatewayResponse`]
/// success envelope. A business-logic failure is mapped to an HTTP status
/// and packaged as a status-coded envelope - from the loop's point of view
/// that invocation *succeeded*, and the upstream gateway caller sees a
/// structured HTTP response instead of a runtime error.
pub struct GatewayEventHandler<F, C = JsonConverter> {
    function: F,
    converter: C,
}

impl<F: Function> GatewayEventHandler<F> {
    /// Wrap a function with the default JSON converter.
    pub fn new(function: F) -> Self {
        Self {
            function,
            converter: JsonConverter,
        }
    }
}

impl<F: Function, C: Converter> GatewayEventHandler<F, C> {
    /// Wrap a function with an explicit converter.
    pub fn with_converter(function: F, converter: C) -> Self {
        Self { function, converter }
    }

    /// Run one envelope through the function.
    ///
    /// Rejections (bad envelope, bad input, business failure) come back as
    /// status-coded envelopes; only an unencodable function output escapes
    /// as a handler failure.
    async fn dispatch(
        &self,
        event: &[u8],
        ctx: &InvocationContext,
    ) -> Result<GatewayResponse, HandlerError> {
        let request: GatewayRequest = match self.converter.from_wire(event) {
            Ok(request) => request,
            Err(e) => {
                return Ok(rejection(&HandlerError::validation(format!(
                    "malformed gateway envelope: {e}"
                ))));
            }
        };

        let body = match request.body_bytes() {
            Ok(body) => body.unwrap_or_default(),
            Err(e) => return Ok(rejection(&HandlerError::validation(e.to_string()))),
        };

        let input: F::Input = match self.converter.from_wire(&body) {
            Ok(input) => input,
            Err(e) => {
                return Ok(rejection(&HandlerError::validation(format!(
                    "malformed request body: {e}"
                ))));
            }
        };

        debug!(request_id = %ctx.request_id, method = %request.http_method, path = %request.path,
            "gateway invocation started");

        match self.function.invoke(input, ctx).await {
            Ok(output) => {
                let body = self.converter.to_wire(&output).map_err(|e| {
                    HandlerError::serialization(format!("unencodable function output: {e}"))
                })?;
                Ok(GatewayResponse::ok(String::from_utf8_lossy(&body).into_owned())
                    .with_header("Content-Type", "application/json"))
            }
            Err(failure) => Ok(rejection(&failure)),
        }
    }
}

#[async_trait]
impl<F: Function, C: Converter> EventHandler for GatewayEventHandler<F, C> {
    async fn handle(
        &self,
        event: &[u8],
        ctx: &InvocationContext,
    ) -> Result<Vec<u8>, HandlerError> {
        let envelope = self.dispatch(event, ctx).await?;
        self.converter
            .to_wire(&envelope)
            .map_err(|e| HandlerError::serialization(format!("unencodable gateway envelope: {e}")))
    }
}

/// Map a failure kind to the HTTP status presented to the gateway caller.
fn status_for_kind(kind: &str) -> u16 {
    match kind {
        HandlerError::VALIDATION => 400,
        HandlerError::UNAUTHORIZED => 401,
        HandlerError::NOT_FOUND => 404,
        HandlerError::TIMEOUT => 408,
        _ => 500,
    }
}

fn rejection(failure: &HandlerError) -> GatewayResponse {
    let body = Diagnostic::from(failure).to_body();
    GatewayResponse::status(status_for_kind(&failure.kind))
        .with_header("Content-Type", "application/json")
        .with_body(String::from_utf8_lossy(&body).into_owned())
}
