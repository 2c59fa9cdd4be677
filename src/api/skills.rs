//! Skill listing endpoint

use crate::server::AppState;
use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

/// One registered skill
#[derive(Debug, Serialize)]
pub struct SkillInfo {
    /// Skill name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Declared parameter names
    pub parameters: Vec<String>,
}

/// Skill list response
#[derive(Debug, Serialize)]
pub struct SkillListResponse {
    /// Registered skills, in registration order
    pub skills: Vec<SkillInfo>,
    /// Number of registered skills
    pub count: usize,
}

/// List the registered skills
pub async fn list_skills(State(state): State<AppState>) -> Json<SkillListResponse> {
    let skills: Vec<SkillInfo> = state
        .orchestrator
        .registry()
        .definitions()
        .iter()
        .map(|def| SkillInfo {
            name: def.name.clone(),
            description: def.description.clone(),
            parameters: def.parameters.iter().map(|p| p.name.clone()).collect(),
        })
        .collect();
    let count = skills.len();
    Json(SkillListResponse { skills, count })
}
