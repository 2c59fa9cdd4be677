//! Error types for factotum-skills

use thiserror::Error;

/// Skill system error type
#[derive(Debug, Error)]
pub enum Error {
    /// A skill with the same name is already registered
    #[error("duplicate skill: {0}")]
    DuplicateSkill(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
