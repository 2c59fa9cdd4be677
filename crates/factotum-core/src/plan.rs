//! Plan - The structured output of the planner
//!
//! A plan is created fresh per request from the planner's reply and is never
//! persisted. The reply arrives as free text; [`Plan::from_llm_text`] strips
//! markdown fences, extracts the first top-level JSON object, and
//! deserializes it with lenient defaults so a partially formed reply still
//! yields a usable plan.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One planned invocation of a named skill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Step number, for diagnostics and context keys only. Execution order
    /// is the sequence order in the plan, never a re-sort by this number.
    #[serde(default)]
    pub step: u32,
    /// Name of the skill to invoke
    pub skill: String,
    /// Declared parameters: literals or `$key` context references
    #[serde(default)]
    pub params: serde_json::Map<String, Value>,
    /// What this step does, informational
    #[serde(default)]
    pub description: String,
}

/// Execution plan for one user request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Short description of the user's intent
    #[serde(default)]
    pub intent: String,
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Reply template hint for response synthesis
    #[serde(default)]
    pub final_response_template: String,
    /// Set when planning itself failed; presence skips execution entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Plan {
    /// Create a failure plan with no steps and the error field set.
    #[must_use]
    pub fn failure(intent: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            steps: Vec::new(),
            final_response_template: String::new(),
            error: Some(error.into()),
        }
    }

    /// Parse a plan from raw LLM output text.
    ///
    /// Errors with [`Error::PlanParsing`] when no JSON object can be
    /// recovered from the text.
    pub fn from_llm_text(text: &str) -> Result<Self> {
        let json_text = extract_json_object(text)
            .ok_or_else(|| Error::PlanParsing("no JSON object in planner output".to_string()))?;
        serde_json::from_str(&json_text).map_err(|e| Error::PlanParsing(e.to_string()))
    }
}

/// Extract the first top-level `{...}` object from LLM output.
///
/// Handles replies wrapped in ```json fences or surrounded by prose.
fn extract_json_object(text: &str) -> Option<String> {
    let mut trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```json") {
        trimmed = rest;
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        trimmed = rest;
    }
    trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed).trim();

    if trimmed.starts_with('{') {
        return Some(trimmed.to_string());
    }
    // Greedy brace match over the whole reply, newlines included.
    let re = Regex::new(r"(?s)\{.*\}").ok()?;
    re.find(trimmed).map(|m| m.as_str().to_string())
}
