//! PlanExecutor - Sequential plan execution with continue-on-error
//!
//! Drives a plan's steps in declared order against the skill registry,
//! threading an [`ExecutionContext`] between steps. A failed step never
//! aborts the plan; every declared step is attempted and its outcome
//! recorded. The only full skip is a plan that arrives with a top-level
//! planning error, which short-circuits before the registry is touched.

use crate::context::{resolve_params, ExecutionContext};
use crate::plan::Plan;
use factotum_skills::SkillRegistry;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Context keys copied up from step payloads to top level by default.
///
/// The executor writes `step{N}_result` for every payload; these fields are
/// additionally promoted to plain keys so later steps can reference them as
/// `$order_id` instead of digging through a prior result.
pub const DEFAULT_SHARED_FIELDS: &[&str] =
    &["order_id", "customer_email", "product_id", "tracking"];

/// Outcome of one step
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    /// Declared step number
    pub step: u32,
    /// Skill that was (or should have been) invoked
    pub skill: String,
    /// Whether the step succeeded
    pub success: bool,
    /// Payload returned by the skill, when it returned one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Fault description, when the step failed without a payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Step description from the plan
    pub description: String,
}

/// Aggregate outcome of executing a plan
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// AND over all step results; vacuously true for zero steps
    pub success: bool,
    /// Per-step outcomes, in execution order
    pub step_results: Vec<StepResult>,
    /// Final context snapshot
    pub context: ExecutionContext,
    /// Planning error that short-circuited execution, if any
    pub error: Option<String>,
}

/// Sequential plan executor
///
/// Holds a shared reference to the registry; the registry itself is
/// immutable after assembly, so executions from concurrent requests need
/// no synchronization.
pub struct PlanExecutor {
    registry: Arc<SkillRegistry>,
    shared_fields: Vec<String>,
}

impl PlanExecutor {
    /// Create an executor with the default shared-field allow-list
    #[must_use]
    pub fn new(registry: Arc<SkillRegistry>) -> Self {
        Self {
            registry,
            shared_fields: DEFAULT_SHARED_FIELDS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Override the set of payload fields promoted to top-level context keys.
    ///
    /// The set of cross-step-shareable fields is part of the contract
    /// between skills, so it is configuration rather than a hidden constant.
    #[must_use]
    pub fn with_shared_fields(mut self, fields: Vec<String>) -> Self {
        self.shared_fields = fields;
        self
    }

    /// Get the registry backing this executor
    #[must_use]
    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    /// Execute a plan's steps in declared order.
    ///
    /// Never returns an error: per-step faults are captured as failed
    /// [`StepResult`]s and execution continues with the next step.
    #[instrument(skip(self, plan), fields(intent = %plan.intent, steps = plan.steps.len()))]
    pub async fn execute(&self, plan: &Plan) -> ExecutionResult {
        if let Some(error) = &plan.error {
            warn!(%error, "Skipping execution, plan carries a planning error");
            return ExecutionResult {
                success: false,
                step_results: Vec::new(),
                context: ExecutionContext::new(),
                error: Some(error.clone()),
            };
        }

        let mut context = ExecutionContext::new();
        let mut step_results = Vec::with_capacity(plan.steps.len());

        for step in &plan.steps {
            info!(step = step.step, skill = %step.skill, description = %step.description, "Executing step");

            let Some(skill) = self.registry.lookup(&step.skill) else {
                warn!(skill = %step.skill, "Skill not found");
                step_results.push(StepResult {
                    step: step.step,
                    skill: step.skill.clone(),
                    success: false,
                    result: None,
                    error: Some(format!("unknown skill: {}", step.skill)),
                    description: step.description.clone(),
                });
                continue;
            };

            let resolved = resolve_params(&step.params, &context);

            match skill.invoke(resolved).await {
                Ok(payload) => {
                    self.merge_payload(&mut context, step.step, &payload);
                    let success = payload
                        .as_object()
                        .and_then(|o| o.get("success"))
                        .and_then(Value::as_bool)
                        .unwrap_or(true);
                    debug!(step = step.step, success, "Step completed");
                    step_results.push(StepResult {
                        step: step.step,
                        skill: step.skill.clone(),
                        success,
                        result: Some(payload),
                        error: None,
                        description: step.description.clone(),
                    });
                }
                Err(e) => {
                    warn!(step = step.step, error = %e, "Step failed");
                    step_results.push(StepResult {
                        step: step.step,
                        skill: step.skill.clone(),
                        success: false,
                        result: None,
                        error: Some(e.to_string()),
                        description: step.description.clone(),
                    });
                }
            }
        }

        // Vacuously true for a zero-step plan.
        let success = step_results.iter().all(|r| r.success);
        ExecutionResult {
            success,
            step_results,
            context,
            error: None,
        }
    }

    /// Merge a step payload into the context: the raw payload under
    /// `step{N}_result`, plus each configured shared field found at the
    /// payload's top level. Runs for every returned payload, including
    /// envelope failures, so partial data (ids, emails) stays referencable.
    fn merge_payload(&self, context: &mut ExecutionContext, step_number: u32, payload: &Value) {
        context.insert(format!("step{}_result", step_number), payload.clone());
        if let Some(object) = payload.as_object() {
            for field in &self.shared_fields {
                if let Some(value) = object.get(field) {
                    context.insert(field.clone(), value.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Step;
    use factotum_skills::{Error as SkillError, Skill, SkillDefinition, SkillParams};
    use serde_json::json;

    struct CannedSkill {
        definition: SkillDefinition,
        payload: Value,
    }

    impl CannedSkill {
        fn new(name: &str, payload: Value) -> Self {
            Self {
                definition: SkillDefinition::new(name, "canned"),
                payload,
            }
        }
    }

    #[async_trait::async_trait]
    impl Skill for CannedSkill {
        fn definition(&self) -> &SkillDefinition {
            &self.definition
        }

        async fn invoke(&self, _params: SkillParams) -> factotum_skills::Result<Value> {
            Ok(self.payload.clone())
        }
    }

    /// Echoes its resolved params back as the payload.
    struct EchoSkill {
        definition: SkillDefinition,
    }

    #[async_trait::async_trait]
    impl Skill for EchoSkill {
        fn definition(&self) -> &SkillDefinition {
            &self.definition
        }

        async fn invoke(&self, params: SkillParams) -> factotum_skills::Result<Value> {
            Ok(Value::Object(params))
        }
    }

    struct FaultySkill {
        definition: SkillDefinition,
    }

    #[async_trait::async_trait]
    impl Skill for FaultySkill {
        fn definition(&self) -> &SkillDefinition {
            &self.definition
        }

        async fn invoke(&self, _params: SkillParams) -> factotum_skills::Result<Value> {
            Err(SkillError::Network("connection refused".to_string()))
        }
    }

    fn step(number: u32, skill: &str, params: Value) -> Step {
        Step {
            step: number,
            skill: skill.to_string(),
            params: params.as_object().cloned().unwrap_or_default(),
            description: String::new(),
        }
    }

    fn plan(steps: Vec<Step>) -> Plan {
        Plan {
            intent: "test".to_string(),
            steps,
            final_response_template: String::new(),
            error: None,
        }
    }

    fn executor(skills: Vec<Arc<dyn Skill>>) -> PlanExecutor {
        let mut registry = SkillRegistry::new();
        for skill in skills {
            registry.register(skill).unwrap();
        }
        PlanExecutor::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_zero_steps_is_vacuous_success() {
        let exec = executor(vec![]);
        let result = exec.execute(&plan(vec![])).await;
        assert!(result.success);
        assert!(result.step_results.is_empty());
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_single_step_populates_context() {
        let exec = executor(vec![Arc::new(CannedSkill::new(
            "get_order",
            json!({"order_id": "12345", "status": "shipped", "tracking": "SF1"}),
        ))]);

        let result = exec
            .execute(&plan(vec![step(1, "get_order", json!({"order_id": "12345"}))]))
            .await;

        assert!(result.success);
        assert_eq!(result.step_results.len(), 1);
        assert_eq!(result.context.get("order_id"), Some(&json!("12345")));
        assert_eq!(result.context.get("tracking"), Some(&json!("SF1")));
        assert!(result.context.contains("step1_result"));
    }

    #[tokio::test]
    async fn test_cross_step_reference() {
        let exec = executor(vec![
            Arc::new(CannedSkill::new(
                "get_order",
                json!({"order_id": "999", "customer_email": "a@b.com"}),
            )),
            Arc::new(EchoSkill {
                definition: SkillDefinition::new("notify", "echo"),
            }),
        ]);

        let result = exec
            .execute(&plan(vec![
                step(1, "get_order", json!({"order_id": "999"})),
                step(2, "notify", json!({"to": "$customer_email"})),
            ]))
            .await;

        assert!(result.success);
        let notify_payload = result.step_results[1].result.as_ref().unwrap();
        assert_eq!(notify_payload["to"], json!("a@b.com"));
    }

    #[tokio::test]
    async fn test_unknown_skill_continues() {
        let exec = executor(vec![Arc::new(CannedSkill::new("real", json!({"ok": 1})))]);

        let result = exec
            .execute(&plan(vec![
                step(1, "ghost_skill", json!({})),
                step(2, "real", json!({})),
            ]))
            .await;

        assert!(!result.success);
        assert_eq!(result.step_results.len(), 2);
        assert!(!result.step_results[0].success);
        assert!(result.step_results[0]
            .error
            .as_ref()
            .unwrap()
            .contains("ghost_skill"));
        assert!(result.step_results[1].success);
    }

    #[tokio::test]
    async fn test_planner_error_short_circuits() {
        let exec = executor(vec![Arc::new(CannedSkill::new("real", json!({})))]);

        let result = exec
            .execute(&Plan::failure("parse failed", "ambiguous request"))
            .await;

        assert!(!result.success);
        assert!(result.step_results.is_empty());
        assert_eq!(result.error.as_deref(), Some("ambiguous request"));
    }

    #[tokio::test]
    async fn test_fault_continues_to_next_step() {
        let exec = executor(vec![
            Arc::new(FaultySkill {
                definition: SkillDefinition::new("flaky", "always faults"),
            }),
            Arc::new(CannedSkill::new("real", json!({"done": true}))),
        ]);

        let result = exec
            .execute(&plan(vec![
                step(1, "flaky", json!({})),
                step(2, "real", json!({})),
            ]))
            .await;

        assert!(!result.success);
        assert_eq!(result.step_results.len(), 2);
        assert!(result.step_results[0]
            .error
            .as_ref()
            .unwrap()
            .contains("connection refused"));
        assert!(result.step_results[1].success);
    }

    #[tokio::test]
    async fn test_envelope_failure_marks_step_failed_but_merges_context() {
        let exec = executor(vec![Arc::new(CannedSkill::new(
            "get_order",
            json!({"success": false, "order_id": "777", "error": "order not found"}),
        ))]);

        let result = exec
            .execute(&plan(vec![step(1, "get_order", json!({"order_id": "777"}))]))
            .await;

        assert!(!result.success);
        assert!(!result.step_results[0].success);
        // The payload still merges so its fields stay referencable.
        assert_eq!(result.context.get("order_id"), Some(&json!("777")));
    }

    #[tokio::test]
    async fn test_custom_shared_fields() {
        let mut registry = SkillRegistry::new();
        registry
            .register(Arc::new(CannedSkill::new(
                "lookup",
                json!({"invoice_id": "INV-1", "order_id": "12345"}),
            )))
            .unwrap();
        let exec = PlanExecutor::new(Arc::new(registry))
            .with_shared_fields(vec!["invoice_id".to_string()]);

        let result = exec
            .execute(&plan(vec![step(1, "lookup", json!({}))]))
            .await;

        assert_eq!(result.context.get("invoice_id"), Some(&json!("INV-1")));
        assert!(result.context.get("order_id").is_none());
    }

    #[tokio::test]
    async fn test_last_writer_wins_for_shared_fields() {
        let exec = executor(vec![
            Arc::new(CannedSkill::new("first", json!({"order_id": "1"}))),
            Arc::new(CannedSkill::new("second", json!({"order_id": "2"}))),
        ]);

        let result = exec
            .execute(&plan(vec![
                step(1, "first", json!({})),
                step(2, "second", json!({})),
            ]))
            .await;

        assert_eq!(result.context.get("order_id"), Some(&json!("2")));
    }
}
