// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Kestrel Runtime - invocation loop and control-plane client for Kestrel
//! functions.
//!
//! A Kestrel function is an ordinary process that long-polls its host's
//! control plane for work, dispatches each work item to user code, and
//! posts back either a result or a structured error. This crate implements
//! that protocol: the poll/dispatch/respond loop, the per-invocation
//! context, the handler adaptation variants, and the failure-isolation
//! policy that keeps one bad invocation from taking the process down while
//! letting one bad initialization do exactly that.
//!
//! # Quick Start
//!
//! ```ignore
//! use async_trait::async_trait;
//! use kestrel_runtime::{Function, HandlerError, HandlerKind, InvocationContext, handler};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize)]
//! struct Request { name: String }
//!
//! #[derive(Serialize)]
//! struct Response { greeting: String }
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Function for Hello {
//!     type Input = Request;
//!     type Output = Response;
//!
//!     async fn invoke(
//!         &self,
//!         input: Request,
//!         _ctx: &InvocationContext,
//!     ) -> Result<Response, HandlerError> {
//!         Ok(Response { greeting: format!("Hello - {}", input.name) })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> kestrel_runtime::Result<()> {
//!     // Bind the variant once; the loop never revisits this decision.
//!     kestrel_runtime::start(|_config| async {
//!         Ok(handler::bind(HandlerKind::InputEvent, Hello))
//!     })
//!     .await
//! }
//! ```
//!
//! # Invocation Protocol
//!
//! The control plane exposes four endpoints, derived once from a single
//! base address:
//!
//! | Endpoint | Role |
//! |----------|------|
//! | `GET {base}/invocation/next` | long-poll for the next work item |
//! | `POST {base}/invocation/{id}/response` | deliver a successful result |
//! | `POST {base}/invocation/{id}/error` | deliver an invocation failure |
//! | `POST {base}/init/error` | report a fatal startup/loop failure |
//!
//! The poll response carries the payload in its body and the work item
//! metadata in headers (`Kestrel-Request-Id`, optionally
//! `Kestrel-Deadline-Ms` and `Kestrel-Trace-Id`). Exactly one work item is
//! in flight per process; responses are posted in fetch order.
//!
//! # Failure Tiers
//!
//! - **Fatal**: missing configuration, handler construction failure, or a
//!   control plane that violates the protocol (error status, empty body,
//!   missing request id on the poll). Reported once to `/init/error`, then
//!   the loop terminates.
//! - **Per-invocation**: anything the handler (or result encoding) fails
//!   with. Reported to that request's `/error` endpoint; the loop carries
//!   on with the next fetch.
//! - **Reporting failures**: logged, never retried, never escalated.
//!
//! # Configuration
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `KESTREL_RUNTIME_API` | Yes | - | Control-plane base address |
//! | `KESTREL_CONNECT_TIMEOUT_MS` | No | `10000` | Connection timeout |
//! | `KESTREL_POST_TIMEOUT_MS` | No | `30000` | Response/error post timeout |
//!
//! The poll request itself is never timed out; it blocks until the control
//! plane hands out work.

mod client;
mod config;
mod context;
mod convert;
mod diagnostic;
mod error;
mod function;
pub mod handler;
mod invoker;

// Main types
pub use client::{Invocation, RuntimeApiClient};
pub use config::{RUNTIME_API_VAR, RuntimeConfig};
pub use context::{HEADER_DEADLINE_MS, HEADER_REQUEST_ID, HEADER_TRACE_ID, InvocationContext};
pub use convert::{ConvertError, Converter, JsonConverter};
pub use diagnostic::Diagnostic;
pub use error::{Result, RuntimeError};
pub use function::Function;
pub use handler::{EventHandler, GatewayEventHandler, HandlerError, HandlerKind, InputEventHandler};
pub use invoker::{FunctionRuntime, run_with, start};

// Re-export the gateway envelope types for gateway-mode functions
pub use kestrel_events as events;
