// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The user-logic contract.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::context::InvocationContext;
use crate::handler::HandlerError;

/// A user-supplied function invoked once per work item.
///
/// Implementations receive a typed input decoded from the invocation
/// payload and return a typed output, or reject the invocation with a
/// [`HandlerError`]. Payload decoding and encoding is the job of the
/// handler variant wrapping the function, never of the function itself.
///
/// One function instance serves every invocation of the process lifetime;
/// the runtime neither guarantees nor prevents state kept across
/// invocations.
///
/// ```
/// use async_trait::async_trait;
/// use kestrel_runtime::{Function, HandlerError, InvocationContext};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize)]
/// struct Request { name: String }
///
/// #[derive(Serialize)]
/// struct Response { greeting: String }
///
/// struct Hello;
///
/// #[async_trait]
/// impl Function for Hello {
///     type Input = Request;
///     type Output = Response;
///
///     async fn invoke(
///         &self,
///         input: Request,
///         _ctx: &InvocationContext,
///     ) -> Result<Response, HandlerError> {
///         Ok(Response { greeting: format!("Hello - {}", input.name) })
///     }
/// }
/// ```
#[async_trait]
pub trait Function: Send + Sync {
    /// Typed invocation input, decoded from the raw payload.
    type Input: DeserializeOwned + Send;
    /// Typed invocation output, encoded into the response body.
    type Output: Serialize + Send;

    /// Process one invocation.
    async fn invoke(
        &self,
        input: Self::Input,
        ctx: &InvocationContext,
    ) -> Result<Self::Output, HandlerError>;
}
