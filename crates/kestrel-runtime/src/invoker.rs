// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The invocation loop: poll, dispatch, respond, forever.
//!
//! Two failure tiers exist because the control plane distinguishes "this
//! instance failed to initialize" (it needs a replacement) from "this one
//! invocation failed" (the instance can serve the next request):
//!
//! - Bootstrap failures and protocol violations on the poll are fatal. The
//!   loop reports once to `/init/error` and terminates.
//! - Failures raised while dispatching a handler or encoding its result are
//!   caught at the dispatch boundary, reported to that request's `/error`
//!   endpoint, and the loop carries on.
//! - Failures while *posting* a response or error are logged and never
//!   escalated; the control plane's own timeouts reassign the work item.

use std::future::Future;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::client::RuntimeApiClient;
use crate::config::RuntimeConfig;
use crate::diagnostic::Diagnostic;
use crate::error::{Result, RuntimeError};
use crate::handler::EventHandler;

/// The runtime: one control-plane client bound to one handler.
///
/// Owns the handler and its dependency graph for the process lifetime;
/// everything is released by drop on every exit path. The loop is strictly
/// sequential - one work item in flight at any time, responses posted in
/// fetch order.
pub struct FunctionRuntime<H> {
    client: RuntimeApiClient,
    handler: H,
}

impl<H: EventHandler> FunctionRuntime<H> {
    /// Bind a handler to the configured control plane.
    pub fn new(config: &RuntimeConfig, handler: H) -> Result<Self> {
        Ok(Self {
            client: RuntimeApiClient::new(config)?,
            handler,
        })
    }

    /// Bind a handler to an existing client.
    pub fn with_client(client: RuntimeApiClient, handler: H) -> Self {
        Self { client, handler }
    }

    /// Run the invocation loop.
    ///
    /// Returns only on a fatal error, after reporting it to `/init/error`;
    /// a single failed invocation never gets this far. The caller is
    /// expected to exit the process on return.
    pub async fn run(&self) -> Result<()> {
        info!(api = %self.client.api_base(), "entering invocation loop");

        loop {
            let invocation = match self.client.next_invocation().await {
                Ok(invocation) => invocation,
                Err(fatal) => {
                    error!(error = %fatal, "invocation poll failed, shutting down");
                    self.client.post_init_error(&Diagnostic::from(&fatal)).await;
                    return Err(fatal);
                }
            };

            let ctx = &invocation.context;
            let started = Instant::now();

            match self.handler.handle(&invocation.payload, ctx).await {
                Ok(body) => {
                    debug!(request_id = %ctx.request_id,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "invocation succeeded");
                    if let Err(e) = self.client.post_response(&ctx.request_id, body).await {
                        warn!(request_id = %ctx.request_id, error = %e,
                            "failed to deliver invocation response");
                    }
                }
                Err(failure) => {
                    error!(request_id = %ctx.request_id, kind = %failure.kind,
                        "invocation failed: {}", failure.message);
                    self.client
                        .post_error(&ctx.request_id, &Diagnostic::from(&failure))
                        .await;
                }
            }
        }
    }
}

/// Bootstrap a handler and run the loop against the given configuration.
///
/// The `init` factory is invoked exactly once. If it fails, the failure is
/// reported to `/init/error` and returned - the loop never starts and no
/// per-request endpoint is ever touched.
pub async fn run_with<H, F, Fut>(config: RuntimeConfig, init: F) -> Result<()>
where
    H: EventHandler,
    F: FnOnce(RuntimeConfig) -> Fut,
    Fut: Future<Output = Result<H>>,
{
    let client = RuntimeApiClient::new(&config)?;

    let boot = Instant::now();
    match init(config).await {
        Ok(handler) => {
            info!(elapsed_ms = boot.elapsed().as_millis() as u64, "handler initialized");
            FunctionRuntime::with_client(client, handler).run().await
        }
        Err(e) => {
            error!(error = %e, "initialization failed");
            client.post_init_error(&Diagnostic::from(&e)).await;
            Err(e)
        }
    }
}

/// Process entrypoint: configuration from the environment, bootstrap, loop.
///
/// A configuration error cannot be reported to the control plane - there is
/// no address to report to - so it is logged and returned. The loop runs
/// until a fatal error or an interrupt signal; on interrupt the runtime is
/// dropped, releasing the handler and its dependencies.
pub async fn start<H, F, Fut>(init: F) -> Result<()>
where
    H: EventHandler,
    F: FnOnce(RuntimeConfig) -> Fut,
    Fut: Future<Output = Result<H>>,
{
    let config = RuntimeConfig::from_env().map_err(|e| {
        error!(error = %e, "cannot start outside a Kestrel environment");
        e
    })?;

    tokio::select! {
        result = run_with(config, init) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
            Ok(())
        }
    }
}
