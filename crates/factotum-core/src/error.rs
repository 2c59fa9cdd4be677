//! Error types for factotum-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Planner output could not be reduced to valid JSON
    #[error("plan parsing error: {0}")]
    PlanParsing(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] factotum_llm::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
