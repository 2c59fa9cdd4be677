//! Execution context and parameter resolution
//!
//! The context is the key/value store that threads data from completed steps
//! into later ones within a single plan execution. Step params reference it
//! through a small micro-language: a string value starting with `$` names a
//! context key to substitute.

use serde_json::Value;
use std::collections::HashMap;

/// Prefix marking a string param value as a context reference
pub const CONTEXT_SIGIL: char = '$';

/// Key/value store scoped to one plan execution.
///
/// Seeded empty, grown by each step that returns a payload. Entries are
/// never removed; the last writer for a key wins.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    entries: HashMap<String, Value>,
}

impl ExecutionContext {
    /// Create an empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Set a value, overwriting any prior entry
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Check whether a key is present
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the context is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot the context as a JSON object, for result reporting
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.entries.clone().into_iter().collect())
    }
}

/// Resolve a step's declared params against the running context.
///
/// A string value starting with `$` names a context key; when the key
/// exists its value is substituted. When the key is absent the `$key`
/// string passes through unchanged as a literal rather than erroring, so
/// a plan with a bad reference still runs and the stray literal surfaces
/// in the step result for diagnosis. All non-string values pass through
/// untouched.
#[must_use]
pub fn resolve_params(
    params: &serde_json::Map<String, Value>,
    context: &ExecutionContext,
) -> serde_json::Map<String, Value> {
    params
        .iter()
        .map(|(key, value)| {
            let resolved = match value.as_str() {
                Some(s) if s.starts_with(CONTEXT_SIGIL) => {
                    let context_key = &s[1..];
                    context.get(context_key).cloned().unwrap_or_else(|| value.clone())
                }
                _ => value.clone(),
            };
            (key.clone(), resolved)
        })
        .collect()
}
