//! Registry - Skill registration and discovery
//!
//! This module provides a registry for the capabilities the planner can
//! schedule. Skills are registered once at startup with metadata and can be
//! looked up by name; the registry also renders the textual catalogue that
//! briefs the planner.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// One declared parameter of a skill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name as it appears in plan step params
    pub name: String,
    /// Human-readable description (for the planner)
    pub description: String,
}

/// Skill metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Unique skill name
    pub name: String,
    /// Human-readable description (for the planner)
    pub description: String,
    /// Declared parameters, in declaration order
    pub parameters: Vec<ParameterSpec>,
}

impl SkillDefinition {
    /// Create a new skill definition
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Declare a parameter
    #[must_use]
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.parameters.push(ParameterSpec {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    /// Render a one-line catalogue entry: `name: description - params: p1(d1), p2(d2)`.
    ///
    /// The params suffix is omitted for skills that declare no parameters.
    #[must_use]
    pub fn catalogue_line(&self) -> String {
        let mut line = format!("{}: {}", self.name, self.description);
        if !self.parameters.is_empty() {
            let params = self
                .parameters
                .iter()
                .map(|p| format!("{}({})", p.name, p.description))
                .collect::<Vec<_>>()
                .join(", ");
            line.push_str(&format!(" - params: {}", params));
        }
        line
    }
}

/// Invocation parameters: resolved key/value arguments for one step
pub type SkillParams = serde_json::Map<String, serde_json::Value>;

/// Trait for skill implementations
///
/// A skill returns `Ok(payload)` for any invocation that completed at the
/// transport level; semantic failures are signalled inside the payload via a
/// boolean `success` field. `Err` is reserved for faults (network failures,
/// missing required parameters).
#[async_trait::async_trait]
pub trait Skill: Send + Sync {
    /// Get the skill definition
    fn definition(&self) -> &SkillDefinition;

    /// Invoke the skill with resolved parameters
    async fn invoke(&self, params: SkillParams) -> Result<serde_json::Value>;
}

/// Registry mapping skill names to invocable capabilities
///
/// Registration order is preserved for `describe()`. The registry is built
/// once by the assembly layer and treated as immutable afterwards; lookups
/// never mutate it.
pub struct SkillRegistry {
    skills: HashMap<String, Arc<dyn Skill>>,
    /// Names in registration order
    order: Vec<String>,
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            skills: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a skill.
    ///
    /// Fails with [`Error::DuplicateSkill`] if the name is already taken;
    /// the first registration wins and nothing is overwritten. Duplicates
    /// are a wiring bug, surfaced at startup rather than at request time.
    pub fn register(&mut self, skill: Arc<dyn Skill>) -> Result<()> {
        let name = skill.definition().name.clone();
        if self.skills.contains_key(&name) {
            return Err(Error::DuplicateSkill(name));
        }
        debug!(skill = %name, "Registering skill");
        self.order.push(name.clone());
        self.skills.insert(name, skill);
        Ok(())
    }

    /// Get a skill by name
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Skill>> {
        self.skills.get(name).cloned()
    }

    /// Check if a skill exists
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    /// List skill names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// List skill definitions in registration order
    #[must_use]
    pub fn definitions(&self) -> Vec<&SkillDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.skills.get(name).map(|s| s.definition()))
            .collect()
    }

    /// Render the skill catalogue used to brief the planner.
    ///
    /// One line per skill, newline separated, in registration order.
    #[must_use]
    pub fn describe(&self) -> String {
        self.definitions()
            .iter()
            .map(|def| def.catalogue_line())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get skill count
    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// Read a required string parameter from invocation params
pub fn required_str<'a>(params: &'a SkillParams, name: &str) -> Result<&'a str> {
    params
        .get(name)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| Error::InvalidInput(format!("missing required parameter: {}", name)))
}

/// Read an optional string parameter from invocation params
#[must_use]
pub fn optional_str<'a>(params: &'a SkillParams, name: &str) -> Option<&'a str> {
    params.get(name).and_then(serde_json::Value::as_str)
}
