use std::collections::HashMap;

use crate::error::{PlatformError, PlatformResult};
use crate::projects::models::{Project, ProjectStatus};

/// Result of a status transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The project moved to the requested status.
    Applied,
    /// The project already had the requested status and the target is
    /// idempotent (only `verified`).
    Unchanged,
}

/// Enforces the project status state machine.
///
/// Valid transitions:
/// - InProgress -> InReview (student requests review)
/// - InReview -> Verified (mentor verification passes)
///
/// Nothing leaves `Verified`. Re-entering `Verified` is accepted as a no-op so
/// that repeating a passing verification does not fail.
pub struct ProjectLifecycle {
    valid_transitions: HashMap<ProjectStatus, Vec<ProjectStatus>>,
}

impl ProjectLifecycle {
    pub fn new() -> Self {
        let mut valid_transitions = HashMap::new();

        valid_transitions.insert(ProjectStatus::InProgress, vec![ProjectStatus::InReview]);
        valid_transitions.insert(ProjectStatus::InReview, vec![ProjectStatus::Verified]);
        valid_transitions.insert(ProjectStatus::Verified, vec![]);

        Self { valid_transitions }
    }

    /// Check if a transition between two statuses is allowed.
    pub fn can_transition(&self, from: ProjectStatus, to: ProjectStatus) -> bool {
        self.valid_transitions
            .get(&from)
            .map(|targets| targets.contains(&to))
            .unwrap_or(false)
    }

    /// Check a transition without applying it.
    pub fn check(&self, from: ProjectStatus, to: ProjectStatus) -> PlatformResult<TransitionOutcome> {
        if from == to && to == ProjectStatus::Verified {
            return Ok(TransitionOutcome::Unchanged);
        }

        if !self.can_transition(from, to) {
            return Err(PlatformError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        Ok(TransitionOutcome::Applied)
    }

    /// Move a project to a new status in memory.
    ///
    /// The caller persists the change.
    pub fn transition(
        &self,
        project: &mut Project,
        to: ProjectStatus,
    ) -> PlatformResult<TransitionOutcome> {
        let outcome = self.check(project.status, to)?;
        if outcome == TransitionOutcome::Applied {
            tracing::debug!(
                project_id = %project.id,
                from = %project.status,
                to = %to,
                "Project status transition"
            );
            project.status = to;
        }
        Ok(outcome)
    }
}

impl Default for ProjectLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
