//! Factotum Core - Plan execution engine
//!
//! Turns a natural-language request into a structured plan (via an LLM
//! planner), executes the plan's steps against a skill registry with
//! cross-step context propagation and a continue-on-error policy, then
//! synthesizes a user-facing reply.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod plan;
pub mod planner;

pub use context::{resolve_params, ExecutionContext, CONTEXT_SIGIL};
pub use error::{Error, Result};
pub use executor::{ExecutionResult, PlanExecutor, StepResult, DEFAULT_SHARED_FIELDS};
pub use orchestrator::{Orchestrator, ProcessOutcome};
pub use plan::{Plan, Step};
pub use planner::Planner;
