//! Integration tests for Factotum
//!
//! These tests verify the integration between the crates:
//! - factotum-skills: registry assembly and built-in mock skills
//! - factotum-llm: mock provider plumbing
//! - factotum-core: planner, executor, and orchestrator working together

use std::sync::Arc;

use factotum_core::{Orchestrator, Plan, PlanExecutor};
use factotum_llm::MockProvider;
use factotum_skills::builtins::register_mock_skills;
use factotum_skills::SkillRegistry;
use serde_json::json;

fn mock_registry() -> Arc<SkillRegistry> {
    let mut registry = SkillRegistry::new();
    register_mock_skills(&mut registry).expect("mock skills register cleanly");
    Arc::new(registry)
}

// ============================================================================
// Registry + executor integration
// ============================================================================

#[tokio::test]
async fn test_order_lookup_populates_shared_context() {
    let executor = PlanExecutor::new(mock_registry());
    let plan = Plan::from_llm_text(
        r#"{"intent": "check order", "steps": [
            {"step": 1, "skill": "get_order", "params": {"order_id": "12345"}, "description": "look up the order"}
        ]}"#,
    )
    .unwrap();

    let result = executor.execute(&plan).await;

    assert!(result.success);
    assert_eq!(result.context.get("order_id"), Some(&json!("12345")));
    assert_eq!(
        result.context.get("tracking"),
        Some(&json!("SF1234567890"))
    );
    assert_eq!(
        result.context.get("customer_email"),
        Some(&json!("customer@example.com"))
    );
}

#[tokio::test]
async fn test_order_then_notify_threads_email() {
    let executor = PlanExecutor::new(mock_registry());
    let plan = Plan::from_llm_text(
        r#"{"intent": "notify customer", "steps": [
            {"step": 1, "skill": "get_order", "params": {"order_id": "999"}, "description": "look up the order"},
            {"step": 2, "skill": "send_notification", "params": {"to": "$customer_email", "template": "order_delay", "context": {"order_id": "$order_id", "reason": "bad weather", "new_eta": "2025-02-02"}}, "description": "apologize for the delay"}
        ]}"#,
    )
    .unwrap();

    let result = executor.execute(&plan).await;

    assert!(result.success);
    let notify = &result.step_results[1];
    assert!(notify.success);
    let payload = notify.result.as_ref().unwrap();
    assert_eq!(payload["to"], json!("delayed@example.com"));
}

#[tokio::test]
async fn test_unknown_skill_does_not_stop_the_plan() {
    let executor = PlanExecutor::new(mock_registry());
    let plan = Plan::from_llm_text(
        r#"{"intent": "mixed", "steps": [
            {"step": 1, "skill": "ghost_skill", "params": {}, "description": ""},
            {"step": 2, "skill": "query_inventory", "params": {"product_id": "B"}, "description": ""}
        ]}"#,
    )
    .unwrap();

    let result = executor.execute(&plan).await;

    assert!(!result.success);
    assert_eq!(result.step_results.len(), 2);
    assert!(!result.step_results[0].success);
    assert!(result.step_results[1].success);
    assert_eq!(result.context.get("product_id"), Some(&json!("B")));
}

// ============================================================================
// Full orchestrator cycle with a scripted provider
// ============================================================================

#[tokio::test]
async fn test_full_cycle_happy_path() {
    let provider = MockProvider::new();
    provider.add_response(
        r#"{"intent": "check order status", "steps": [
            {"step": 1, "skill": "get_order", "params": {"order_id": "12345"}, "description": "look up the order"},
            {"step": 2, "skill": "query_logistics", "params": {"tracking_number": "$tracking"}, "description": "check the shipment"}
        ], "final_response_template": "order status report"}"#,
    );
    provider.add_response("Order 12345 shipped and is in transit, arriving 2025-01-28.");

    let orchestrator = Orchestrator::new(mock_registry(), Arc::new(provider));
    let outcome = orchestrator.process("where is my order 12345?").await;

    assert!(outcome.success);
    assert_eq!(outcome.execution_result.step_results.len(), 2);
    assert_eq!(
        outcome.response,
        "Order 12345 shipped and is in transit, arriving 2025-01-28."
    );
    // The logistics step resolved $tracking from the order payload.
    let logistics = outcome.execution_result.step_results[1]
        .result
        .as_ref()
        .unwrap();
    assert_eq!(logistics["carrier"], json!("SF Express"));
}

#[tokio::test]
async fn test_full_cycle_planner_failure_degrades() {
    let provider = MockProvider::new();
    provider.add_response("I am not able to produce a plan.");
    provider.add_failure("synthesis unavailable");

    let orchestrator = Orchestrator::new(mock_registry(), Arc::new(provider));
    let outcome = orchestrator.process("gibberish").await;

    assert!(!outcome.success);
    assert!(outcome.plan.error.is_some());
    assert!(outcome.execution_result.step_results.is_empty());
    assert!(!outcome.response.is_empty());
}

#[tokio::test]
async fn test_full_cycle_envelope_failure_reported() {
    let provider = MockProvider::new();
    provider.add_response(
        r#"{"intent": "check order", "steps": [
            {"step": 1, "skill": "get_order", "params": {"order_id": "777"}, "description": "look up the order"}
        ]}"#,
    );
    provider.add_response("Order 777 was not found.");

    let orchestrator = Orchestrator::new(mock_registry(), Arc::new(provider));
    let outcome = orchestrator.process("where is order 777?").await;

    assert!(!outcome.success);
    let step = &outcome.execution_result.step_results[0];
    assert!(!step.success);
    assert_eq!(step.result.as_ref().unwrap()["status"], json!("not_found"));
}
