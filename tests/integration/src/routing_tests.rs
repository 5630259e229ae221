//! Routing evaluation integration tests
//!
//! Exercises the rule selector through the evaluation endpoint: priority
//! ordering, tie-breaking, disabled rules, wildcards, and the default
//! provider fallback.

use crate::fixtures::*;
use crate::helpers::*;
use routing_core::ProviderId;
use routing_server::AppState;
use serde_json::json;

async fn server_with_default(default: Option<&str>) -> TestServer {
    let mut builder = AppState::builder();
    if let Some(provider) = default {
        builder = builder.default_provider(ProviderId::new(provider));
    }
    TestServer::with_state(builder.build()).await
}

async fn create_rule(server: &TestServer, ws: &str, rule: &serde_json::Value) {
    let response = server
        .post_json(&format!("/admin/workspaces/{ws}/rules"), rule)
        .await;
    assert_status(&response, 201);
}

#[tokio::test]
async fn test_highest_priority_wins() {
    let server = server_with_default(None).await;
    let ws = random_workspace();

    create_rule(&server, &ws, &rule_json("r-low", "low", 5, "openai")).await;
    create_rule(&server, &ws, &rule_json("r-high", "high", 10, "anthropic")).await;

    let response = server
        .post_json(
            &format!("/v1/workspaces/{ws}/route"),
            &request_json("gpt-4o", 100),
        )
        .await;
    assert_status(&response, 200);

    let decision = TestServer::json_body(response).await;
    assert_eq!(decision["matched"], true);
    assert_eq!(decision["rule_id"], "r-high");
    assert_eq!(decision["provider"], "anthropic");
}

#[tokio::test]
async fn test_priority_tie_breaks_by_ascending_id() {
    let server = server_with_default(None).await;
    let ws = random_workspace();

    // Insertion order deliberately reversed
    create_rule(&server, &ws, &rule_json("rule-b", "b", 7, "anthropic")).await;
    create_rule(&server, &ws, &rule_json("rule-a", "a", 7, "openai")).await;

    let response = server
        .post_json(
            &format!("/v1/workspaces/{ws}/route"),
            &request_json("gpt-4o", 100),
        )
        .await;
    let decision = TestServer::json_body(response).await;
    assert_eq!(decision["rule_id"], "rule-a");
}

#[tokio::test]
async fn test_selection_is_deterministic() {
    let server = server_with_default(None).await;
    let ws = random_workspace();

    create_rule(&server, &ws, &rule_json("r1", "one", 3, "openai")).await;
    create_rule(&server, &ws, &rule_json("r2", "two", 3, "anthropic")).await;
    create_rule(&server, &ws, &rule_json("r3", "three", 9, "groq")).await;

    let path = format!("/v1/workspaces/{ws}/route");
    let request = request_json("gpt-4o", 100);

    for _ in 0..5 {
        let response = server.post_json(&path, &request).await;
        let decision = TestServer::json_body(response).await;
        assert_eq!(decision["rule_id"], "r3");
    }
}

#[tokio::test]
async fn test_disabled_rule_never_matches() {
    let server = server_with_default(None).await;
    let ws = random_workspace();

    create_rule(&server, &ws, &rule_json("r-live", "live", 1, "anthropic")).await;
    create_rule(&server, &ws, &rule_json("r-off", "off", 100, "openai")).await;
    let response = server
        .patch_json(
            &format!("/admin/workspaces/{ws}/rules/r-off"),
            &json!({"enabled": false}),
        )
        .await;
    assert_status(&response, 200);

    let response = server
        .post_json(
            &format!("/v1/workspaces/{ws}/route"),
            &request_json("gpt-4o", 100),
        )
        .await;
    let decision = TestServer::json_body(response).await;
    assert_eq!(decision["rule_id"], "r-live");
}

#[tokio::test]
async fn test_model_glob_conditions() {
    let server = server_with_default(None).await;
    let ws = random_workspace();

    create_rule(
        &server,
        &ws,
        &rule_json_with_conditions(
            "r-minis",
            "minis to groq",
            10,
            "groq",
            json!({"model": "*-mini"}),
        ),
    )
    .await;
    create_rule(&server, &ws, &rule_json("r-any", "catch all", 1, "openai")).await;

    let path = format!("/v1/workspaces/{ws}/route");

    let decision = TestServer::json_body(
        server.post_json(&path, &request_json("gpt-4o-mini", 50)).await,
    )
    .await;
    assert_eq!(decision["provider"], "groq");

    let decision =
        TestServer::json_body(server.post_json(&path, &request_json("gpt-4o", 50)).await).await;
    assert_eq!(decision["provider"], "openai");
}

#[tokio::test]
async fn test_budget_conditions() {
    let server = server_with_default(None).await;
    let ws = random_workspace();

    create_rule(
        &server,
        &ws,
        &rule_json_with_conditions(
            "r-cheap",
            "cheap requests",
            10,
            "groq",
            json!({"max_cost": 0.1, "max_latency_ms": 1000}),
        ),
    )
    .await;
    create_rule(&server, &ws, &rule_json("r-any", "catch all", 1, "openai")).await;

    let path = format!("/v1/workspaces/{ws}/route");

    // Within both ceilings
    let decision = TestServer::json_body(
        server
            .post_json(&path, &request_json_with_budget("gpt-4o", 50, 0.05, 500))
            .await,
    )
    .await;
    assert_eq!(decision["provider"], "groq");

    // Over the cost ceiling
    let decision = TestServer::json_body(
        server
            .post_json(&path, &request_json_with_budget("gpt-4o", 50, 0.5, 500))
            .await,
    )
    .await;
    assert_eq!(decision["provider"], "openai");
}

#[tokio::test]
async fn test_no_match_uses_default_provider() {
    let server = server_with_default(Some("fallback-provider")).await;
    let ws = random_workspace();

    let response = server
        .post_json(
            &format!("/v1/workspaces/{ws}/route"),
            &request_json("gpt-4o", 100),
        )
        .await;
    assert_status(&response, 200);

    let decision = TestServer::json_body(response).await;
    assert_eq!(decision["matched"], false);
    assert_eq!(decision["used_default"], true);
    assert_eq!(decision["provider"], "fallback-provider");
}

#[tokio::test]
async fn test_no_match_without_default_is_404() {
    let server = server_with_default(None).await;
    let ws = random_workspace();

    let response = server
        .post_json(
            &format!("/v1/workspaces/{ws}/route"),
            &request_json("gpt-4o", 100),
        )
        .await;
    assert_status(&response, 404);
}

#[tokio::test]
async fn test_empty_model_rejected() {
    let server = server_with_default(None).await;
    let ws = random_workspace();

    let response = server
        .post_json(
            &format!("/v1/workspaces/{ws}/route"),
            &request_json("", 100),
        )
        .await;
    assert_status(&response, 400);
}

#[tokio::test]
async fn test_rule_edits_visible_to_next_evaluation() {
    let server = server_with_default(None).await;
    let ws = random_workspace();

    create_rule(&server, &ws, &rule_json("r1", "route", 1, "openai")).await;

    let path = format!("/v1/workspaces/{ws}/route");
    let decision =
        TestServer::json_body(server.post_json(&path, &request_json("gpt-4o", 10)).await).await;
    assert_eq!(decision["provider"], "openai");

    server
        .patch_json(
            &format!("/admin/workspaces/{ws}/rules/r1"),
            &json!({"target_provider": "anthropic"}),
        )
        .await;

    let decision =
        TestServer::json_body(server.post_json(&path, &request_json("gpt-4o", 10)).await).await;
    assert_eq!(decision["provider"], "anthropic");
}
