// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Gateway Function - a function fronted by an HTTP gateway.
//!
//! The invocation payload is a gateway request envelope; the function input
//! is its body. A rejected order produces a 400 envelope for the gateway
//! caller while the invocation itself still counts as served.
//!
//! Run with: KESTREL_RUNTIME_API=127.0.0.1:9001 \
//!     cargo run -p kestrel-example --bin gateway_function

use async_trait::async_trait;
use kestrel_runtime::{Function, HandlerError, HandlerKind, InvocationContext, handler};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
struct PlaceOrder {
    sku: String,
    quantity: u32,
}

#[derive(Debug, Serialize)]
struct OrderPlaced {
    sku: String,
    quantity: u32,
    order_id: String,
}

struct OrderFunction;

#[async_trait]
impl Function for OrderFunction {
    type Input = PlaceOrder;
    type Output = OrderPlaced;

    async fn invoke(
        &self,
        input: PlaceOrder,
        ctx: &InvocationContext,
    ) -> Result<OrderPlaced, HandlerError> {
        if input.sku.is_empty() {
            return Err(HandlerError::validation("sku must not be empty"));
        }
        if input.quantity == 0 {
            return Err(HandlerError::validation("quantity must be positive"));
        }

        info!(request_id = %ctx.request_id, sku = %input.sku, "order accepted");
        Ok(OrderPlaced {
            order_id: format!("order-{}", ctx.request_id),
            sku: input.sku,
            quantity: input.quantity,
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
        Ok(handler::bind(HandlerKind::GatewayEvent, OrderFunction))
    })
    .await
}
