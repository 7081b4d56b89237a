// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! End-to-end invocation loop tests against a mock control plane.
//!
//! The loop never terminates on its own, so every scenario ends by serving
//! an empty poll body: a protocol violation that takes the fatal path and
//! returns control to the test.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kestrel_runtime::{
    Function, FunctionRuntime, HEADER_REQUEST_ID, HandlerError, HandlerKind, InputEventHandler,
    InvocationContext, RuntimeConfig, RuntimeError, handler,
};

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

/// Serve one work item from the poll endpoint.
///
/// Mounted mocks match in mount order and expire after one hit, so calling
/// this repeatedly builds the exact poll sequence the loop will observe.
async fn serve_invocation(server: &MockServer, request_id: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/invocation/next"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(HEADER_REQUEST_ID, request_id)
                .set_body_raw(body.to_string(), "application/json"),
        )
        .up_to_n_times(1)
        .mount(server)
        .await;
}

/// Terminate the sequence: an empty poll body is process-fatal.
async fn serve_terminal_poll(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/invocation/next"))
        .respond_with(ResponseTemplate::new(200).insert_header(HEADER_REQUEST_ID, "terminal"))
        .mount(server)
        .await;
}

async fn run_loop(server: &MockServer) -> kestrel_runtime::Result<()> {
    let runtime = FunctionRuntime::new(
        &RuntimeConfig::new(server.uri()),
        InputEventHandler::new(Greeter),
    )
    .unwrap();
    runtime.run().await
}

#[tokio::test]
async fn scenario_successful_invocation_posts_response() {
    let server = MockServer::start().await;

    serve_invocation(&server, "abc123", r#"{"name":"Ada"}"#).await;
    serve_terminal_poll(&server).await;

    Mock::given(method("POST"))
        .and(path("/invocation/abc123/response"))
        .and(body_partial_json(serde_json::json!({"greeting": "Hello - Ada"})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/invocation/.+/error$"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    // The terminal empty body takes the fatal path and is reported once.
    Mock::given(method("POST"))
        .and(path("/init/error"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_loop(&server).await;
    assert!(matches!(result, Err(RuntimeError::Protocol(_))));

    server.verify().await;
}

#[tokio::test]
async fn scenario_empty_poll_body_is_fatal_without_per_request_posts() {
    let server = MockServer::start().await;

    serve_terminal_poll(&server).await;

    Mock::given(method("POST"))
        .and(path("/init/error"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/invocation/.+$"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let result = run_loop(&server).await;
    assert!(matches!(result, Err(RuntimeError::Protocol(_))));

    server.verify().await;
}

#[tokio::test]
async fn scenario_failing_invocation_posts_error_and_loop_continues() {
    let server = MockServer::start().await;

    serve_invocation(&server, "req-1", r#"{"name":""}"#).await;
    serve_invocation(&server, "req-2", r#"{"name":"Bo"}"#).await;
    serve_terminal_poll(&server).await;

    Mock::given(method("POST"))
        .and(path("/invocation/req-1/error"))
        .and(body_partial_json(serde_json::json!({"errorType": "Validation"})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    // The invocation after the failure is fetched and served normally.
    Mock::given(method("POST"))
        .and(path("/invocation/req-2/response"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/init/error"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_loop(&server).await;
    assert!(result.is_err());

    server.verify().await;
}

#[tokio::test]
async fn every_fetch_is_answered_in_fetch_order() {
    let server = MockServer::start().await;

    serve_invocation(&server, "req-1", r#"{"name":"Ada"}"#).await;
    serve_invocation(&server, "req-2", r#"{"name":""}"#).await;
    serve_invocation(&server, "req-3", r#"{"name":"Grace"}"#).await;
    serve_terminal_poll(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let result = run_loop(&server).await;
    assert!(result.is_err());

    // Strict fetch/answer alternation, answers targeting the id of their
    // own fetch, in fetch order.
    let requests = server.received_requests().await.unwrap();
    let paths: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "/invocation/next",
            "/invocation/req-1/response",
            "/invocation/next",
            "/invocation/req-2/error",
            "/invocation/next",
            "/invocation/req-3/response",
            "/invocation/next",
            "/init/error",
        ]
    );
}

#[tokio::test]
async fn missing_request_id_header_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invocation/next"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"name":"Ada"}"#, "application/json"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/init/error"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_loop(&server).await;
    assert!(matches!(result, Err(RuntimeError::Protocol(_))));

    server.verify().await;
}

#[tokio::test]
async fn gateway_variant_runs_through_the_same_loop() {
    let server = MockServer::start().await;

    let envelope = serde_json::json!({
        "httpMethod": "POST",
        "path": "/greet",
        "body": r#"{"name":"Ada"}"#,
        "isBase64Encoded": false
    });
    serve_invocation(&server, "gw-1", &envelope.to_string()).await;
    serve_terminal_poll(&server).await;

    // A gateway rejection is still a *response*; only the envelope status
    // tells the caller otherwise. Here the invocation plain succeeds.
    Mock::given(method("POST"))
        .and(path("/invocation/gw-1/response"))
        .and(body_partial_json(serde_json::json!({"statusCode": 200})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/init/error"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let runtime = FunctionRuntime::new(
        &RuntimeConfig::new(server.uri()),
        handler::bind(HandlerKind::GatewayEvent, Greeter),
    )
    .unwrap();
    let result = runtime.run().await;
    assert!(result.is_err());

    server.verify().await;
}

#[tokio::test]
async fn response_delivery_failure_does_not_stop_the_loop() {
    let server = MockServer::start().await;

    serve_invocation(&server, "req-1", r#"{"name":"Ada"}"#).await;
    serve_invocation(&server, "req-2", r#"{"name":"Bo"}"#).await;
    serve_terminal_poll(&server).await;

    // The control plane rejects the first response delivery; delivery is
    // best-effort, so the loop still fetches and answers the next item.
    Mock::given(method("POST"))
        .and(path("/invocation/req-1/response"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/invocation/req-2/response"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/init/error"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let result = run_loop(&server).await;
    assert!(result.is_err());

    server.verify().await;
}
