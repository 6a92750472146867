//! Core entities: users, launch packs, projects, reviews and portfolios.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Mentor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Mentor => "mentor",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "mentor" => Ok(Role::Mentor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Trust signal snapshotted into portfolios at publication time.
    pub reliability_score: f64,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            role,
            reliability_score: 0.0,
        }
    }

    /// The part of the email address before `@`.
    pub fn handle(&self) -> &str {
        self.email.split('@').next().unwrap_or_default()
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

/// A reusable project template. Read-only to students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchPack {
    pub id: Uuid,
    /// Unique, URL-safe identifier.
    pub slug: String,
    pub title: String,
    pub description: String,
    pub duration_weeks: u32,
    pub difficulty: String,
    pub tags: Vec<String>,
}

/// A template step belonging to exactly one launch pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: Uuid,
    pub launch_pack_id: Uuid,
    pub title: String,
    pub description: String,
    pub order_index: i32,
    pub estimated_hours: f64,
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    InProgress,
    InReview,
    Verified,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::InReview => "in_review",
            ProjectStatus::Verified => "verified",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ProjectStatus::InProgress),
            "in_review" => Ok(ProjectStatus::InReview),
            "verified" => Ok(ProjectStatus::Verified),
            other => Err(format!("unknown project status '{}'", other)),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's instance of a launch pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub launch_pack_id: Uuid,
    pub title: String,
    pub short_summary: String,
    pub status: ProjectStatus,
    /// Cached derived value, 0-100. Recomputed on every milestone toggle.
    pub progress_percent: u8,
    pub public_slug: String,
    pub started_at: DateTime<Utc>,
}

/// Per-project tracked instance of a template milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMilestone {
    pub id: Uuid,
    pub project_id: Uuid,
    pub milestone_id: Uuid,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: String,
}

impl ProjectMilestone {
    pub fn pending(project_id: Uuid, milestone_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            milestone_id,
            completed: false,
            completed_at: None,
            notes: String::new(),
        }
    }
}

/// The four mentor checklist answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewChecklist {
    pub meets_brief: bool,
    pub core_functional: bool,
    pub docs_ok: bool,
    pub demo_ok: bool,
}

impl ReviewChecklist {
    pub fn new(meets_brief: bool, core_functional: bool, docs_ok: bool, demo_ok: bool) -> Self {
        Self {
            meets_brief,
            core_functional,
            docs_ok,
            demo_ok,
        }
    }

    /// Number of checklist items answered `true`.
    pub fn passed_count(&self) -> usize {
        [self.meets_brief, self.core_functional, self.docs_ok, self.demo_ok]
            .iter()
            .filter(|v| **v)
            .count()
    }
}

/// One review request, assigned to a mentor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub project_id: Uuid,
    pub mentor_id: Uuid,
    pub checklist: ReviewChecklist,
    /// 1-5 once submitted.
    pub rating: Option<u8>,
    pub comments: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Review {
    pub fn assigned(project_id: Uuid, mentor_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            mentor_id,
            checklist: ReviewChecklist::default(),
            rating: None,
            comments: String::new(),
            verified: false,
            created_at: Utc::now(),
            submitted_at: None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}

/// Point-in-time public snapshot of a verified project. Never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: Uuid,
    pub project_id: Uuid,
    pub public_url: String,
    pub mentor_comment: String,
    pub reliability_score_snapshot: f64,
    pub verified_badge: bool,
    pub created_at: DateTime<Utc>,
}
