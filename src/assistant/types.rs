//! Result shapes for each generation operation.
//!
//! Field names on the wire are camelCase, matching what the prompts ask for.

use serde::{Deserialize, Serialize};

/// Shape check applied after deserialization.
///
/// Serde guarantees the fields exist; this rejects payloads that are
/// well-formed but useless (empty lists, blank text).
pub trait ContentSchema {
    fn validate(&self) -> Result<(), String>;
}

/// One suggested project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdea {
    pub problem: String,
    pub solution: String,
    pub tech_stack: Vec<String>,
    pub outcome: String,
}

impl ProjectIdea {
    /// The idea served when generation fails.
    pub fn fallback() -> Self {
        Self {
            problem: "Build a personal productivity dashboard".to_string(),
            solution: "Create a web app to track tasks and goals".to_string(),
            tech_stack: vec![
                "Next.js".to_string(),
                "TypeScript".to_string(),
                "Tailwind CSS".to_string(),
            ],
            outcome: "Complete MVP in 4 weeks".to_string(),
        }
    }
}

impl ContentSchema for Vec<ProjectIdea> {
    fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("expected at least one project idea".to_string());
        }
        for (i, idea) in self.iter().enumerate() {
            if idea.problem.trim().is_empty() || idea.solution.trim().is_empty() {
                return Err(format!("idea {} is missing its problem or solution", i));
            }
        }
        Ok(())
    }
}

/// One milestone of a generated breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deliverables: Vec<String>,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub est_hours: f64,
}

impl ContentSchema for Vec<MilestoneDraft> {
    fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("expected at least one milestone".to_string());
        }
        if let Some(i) = self.iter().position(|m| m.title.trim().is_empty()) {
            return Err(format!("milestone {} has no title", i));
        }
        if let Some(i) = self.iter().position(|m| m.est_hours < 0.0) {
            return Err(format!("milestone {} has negative estHours", i));
        }
        Ok(())
    }
}

/// Implementation checklist for one milestone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneHelp {
    pub steps: Vec<String>,
    #[serde(default)]
    pub starter_code: String,
}

impl ContentSchema for MilestoneHelp {
    fn validate(&self) -> Result<(), String> {
        if self.steps.iter().all(|s| s.trim().is_empty()) {
            return Err("expected at least one implementation step".to_string());
        }
        Ok(())
    }
}

/// Recruiter-facing project summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioBlurb {
    pub blurb: String,
}

impl ContentSchema for PortfolioBlurb {
    fn validate(&self) -> Result<(), String> {
        if self.blurb.trim().is_empty() {
            return Err("blurb is empty".to_string());
        }
        Ok(())
    }
}

/// Outcome of a generation operation.
///
/// Always carries renderable `data`. On failure `error` holds a
/// human-readable message and `data` is the operation's fallback or default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generated<T> {
    pub data: T,
    /// Served from the response cache.
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Generated<T> {
    pub fn fresh(data: T) -> Self {
        Self {
            data,
            cached: false,
            error: None,
        }
    }

    pub fn cached(data: T) -> Self {
        Self {
            data,
            cached: true,
            error: None,
        }
    }

    pub fn failed(data: T, error: impl Into<String>) -> Self {
        Self {
            data,
            cached: false,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
