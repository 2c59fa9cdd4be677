//! HTTP API tests
//!
//! Drive the full router in memory with `tower::ServiceExt::oneshot`: the
//! orchestrator runs over the mock provider and the built-in mock skills,
//! so each test exercises routing, extraction, and response shaping without
//! binding a socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use factotum::server::{build_router, AppState};
use factotum_core::Orchestrator;
use factotum_llm::MockProvider;
use factotum_skills::builtins::register_mock_skills;
use factotum_skills::SkillRegistry;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn router_with(provider: MockProvider) -> Router {
    let mut registry = SkillRegistry::new();
    register_mock_skills(&mut registry).expect("mock skills register cleanly");
    let orchestrator = Orchestrator::new(Arc::new(registry), Arc::new(provider));
    build_router(AppState {
        orchestrator: Arc::new(orchestrator),
    })
}

fn chat_request(user_input: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "user_input": user_input }).to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_chat_happy_path() {
    let provider = MockProvider::new();
    // Planner reply, then synthesis reply.
    provider.add_response(
        r#"{"intent": "check order", "steps": [
            {"step": 1, "skill": "get_order", "params": {"order_id": "12345"}, "description": "look up the order"}
        ]}"#,
    );
    provider.add_response("Your order 12345 has shipped.");

    let response = router_with(provider)
        .oneshot(chat_request("where is order 12345?"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Your order 12345 has shipped."));
    assert!(body.get("error").is_none());

    let debug = &body["debug"];
    assert_eq!(debug["intent"], json!("check order"));
    assert_eq!(debug["steps"].as_array().unwrap().len(), 1);
    assert_eq!(debug["steps"][0]["skill"], json!("get_order"));
    assert!(!debug["request_id"].as_str().unwrap().is_empty());
    assert!(debug["execution_time_ms"].is_u64());
    // The final shared context is exposed for the dashboard.
    assert_eq!(debug["context"]["order_id"], json!("12345"));
    assert_eq!(debug["context"]["tracking"], json!("SF1234567890"));
}

#[tokio::test]
async fn test_chat_planning_failure_shape() {
    let provider = MockProvider::new();
    provider.add_response("I cannot produce a plan for that.");
    provider.add_failure("synthesis down");

    let response = router_with(provider)
        .oneshot(chat_request("???"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("plan parsing error"));
    assert!(body["debug"]["steps"].as_array().unwrap().is_empty());
    assert_eq!(body["debug"]["context"], json!({}));
}

#[tokio::test]
async fn test_list_skills() {
    let response = router_with(MockProvider::new())
        .oneshot(
            Request::builder()
                .uri("/api/skills")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["count"], json!(6));

    let names: Vec<&str> = body["skills"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert!(names.contains(&"get_order"));
    assert!(names.contains(&"send_notification"));
    assert_eq!(body["skills"][0]["parameters"], json!(["order_id"]));
}

#[tokio::test]
async fn test_health_check() {
    let response = router_with(MockProvider::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], json!("healthy"));
}
