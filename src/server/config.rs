//! Server configuration types
//!
//! All wiring decisions live here: which skill set to register (mock or
//! HTTP-backed), which LLM provider to use, and the shared-field allow-list
//! for cross-step context. The engine itself never reads the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// LLM provider settings
    #[serde(default)]
    pub llm: LlmConfig,
    /// Skill assembly settings
    #[serde(default)]
    pub skills: SkillsConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Configuration from environment only, with defaults for the rest.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(mode) = std::env::var("FACTOTUM_SKILL_MODE") {
            config.skills.mode = mode;
        }
        if let Ok(url) = std::env::var("FACTOTUM_BACKEND_URL") {
            config.skills.backend_url = url;
        }
        config
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// LLM provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name: "anthropic" or "mock"
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model override; the provider's default when unset
    #[serde(default)]
    pub model: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
        }
    }
}

fn default_provider() -> String {
    "anthropic".to_string()
}

/// Skill assembly settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    /// Skill set to register: "mock" or "backend"
    #[serde(default = "default_skill_mode")]
    pub mode: String,
    /// Base URL of the business backend (backend mode)
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Backend request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// E-mail webhook URL; mock mailer when unset
    #[serde(default)]
    pub mail_webhook_url: Option<String>,
    /// Payload fields promoted to top-level context keys between steps
    #[serde(default = "default_shared_fields")]
    pub shared_fields: Vec<String>,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            mode: default_skill_mode(),
            backend_url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
            mail_webhook_url: None,
            shared_fields: default_shared_fields(),
        }
    }
}

fn default_skill_mode() -> String {
    "mock".to_string()
}

fn default_backend_url() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_shared_fields() -> Vec<String> {
    factotum_core::DEFAULT_SHARED_FIELDS
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}
