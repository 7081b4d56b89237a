// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Hello Function - the smallest possible Kestrel function.
//!
//! Receives `{"name": "..."}` as the raw invocation payload and answers
//! with `{"greeting": "Hello - ..."}`.
//!
//! Run with: KESTREL_RUNTIME_API=127.0.0.1:9001 \
//!     cargo run -p kestrel-example --bin hello_function

use async_trait::async_trait;
use kestrel_runtime::{Function, HandlerError, HandlerKind, InvocationContext, handler};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
struct Request {
    name: String,
}

#[derive(Debug, Serialize)]
struct Response {
    greeting: String,
}

struct HelloFunction;

#[async_trait]
impl Function for HelloFunction {
    type Input = Request;
    type Output = Response;

    async fn invoke(
        &self,
        input: Request,
        ctx: &InvocationContext,
    ) -> Result<Response, HandlerError> {
        info!(request_id = %ctx.request_id, name = %input.name, "greeting requested");
        Ok(Response {
            greeting: format!("Hello - {}", input.name),
        })
    }
}

#[tokio::main]
async fn main() -> kestrel_runtime::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    kestrel_runtime::start(|_config| async {
        Ok(handler::bind(HandlerKind::InputEvent, HelloFunction))
    })
    .await
}
