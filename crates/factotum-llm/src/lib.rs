//! Factotum LLM - LLM Provider Abstraction
//!
//! This crate provides LLM integration for Factotum:
//! - Provider: the `LlmProvider` trait all backends implement
//! - Anthropic: Claude provider over the Messages API
//! - Mock: queue-backed provider for tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod anthropic;
pub mod completion;
pub mod error;
pub mod message;
pub mod mock;
pub mod provider;
pub mod util;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use error::{Error, Result};
pub use message::{Message, MessageRole};
pub use mock::MockProvider;
pub use provider::LlmProvider;
