// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Gateway event envelopes for the Kestrel function runtime.
//!
//! When a function sits behind an HTTP gateway, the control plane delivers
//! the invocation payload wrapped in a request envelope and expects the
//! result wrapped in a response envelope carrying an HTTP status code and
//! headers. These types define that wire shape; the runtime's gateway
//! handler variant does the unwrapping and rewrapping.
//!
//! ```
//! use kestrel_events::{GatewayRequest, GatewayResponse};
//!
//! let request = GatewayRequest::new("POST", "/orders").with_body(r#"{"sku":"A-1"}"#);
//! assert_eq!(request.body_bytes().unwrap().unwrap(), br#"{"sku":"A-1"}"#);
//!
//! let response = GatewayResponse::ok(r#"{"accepted":true}"#);
//! assert_eq!(response.status_code, 200);
//! ```

mod request;
mod response;

pub use request::{BodyDecodeError, GatewayRequest};
pub use response::GatewayResponse;
