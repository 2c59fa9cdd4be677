//! Factotum Skills - Skill registry and built-in capabilities
//!
//! This crate provides the skill system for Factotum:
//! - Registry: the `Skill` trait, skill metadata, and the named registry
//!   that renders the planner catalogue
//! - Builtins: HTTP-backed order/inventory/logistics lookups, templated
//!   e-mail notifications, and an in-memory mock backend for development

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builtins;
pub mod error;
pub mod registry;

pub use error::{Error, Result};
pub use registry::{
    optional_str, required_str, ParameterSpec, Skill, SkillDefinition, SkillParams, SkillRegistry,
};
