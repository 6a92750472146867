//! Milestone completion tracking.
//!
//! `progress_percent` on a project is a cached derived value. Every toggle
//! goes through [`ProgressTracker::toggle`]; the store recounts the project's
//! full milestone set inside the same write as the milestone, so concurrent
//! toggles on one project commute. Rows changed any other way stay stale
//! until [`ProgressTracker::recompute`].

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{PlatformError, PlatformResult};
use crate::metrics;
use crate::projects::authenticated;
use crate::projects::models::{Identity, Project, ProjectMilestone};
use crate::storage::Store;

/// `round(100 * completed / total)`, rounding halves up. Zero when `total` is zero.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u8
}

/// Result of a toggle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressUpdate {
    pub milestone: ProjectMilestone,
    pub progress_percent: u8,
}

pub struct ProgressTracker {
    store: Arc<dyn Store>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn owned_milestone(
        &self,
        caller: Option<&Identity>,
        project_milestone_id: Uuid,
    ) -> PlatformResult<(ProjectMilestone, Project)> {
        let caller = authenticated(caller)?;
        let milestone = self
            .store
            .get_project_milestone(project_milestone_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Project milestone", project_milestone_id))?;
        let project = self
            .store
            .get_project(milestone.project_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Project", milestone.project_id))?;

        if project.owner_id != caller.user_id {
            return Err(PlatformError::Forbidden(
                "only the project owner may update its milestones".to_string(),
            ));
        }
        Ok((milestone, project))
    }

    /// Mark a milestone complete or incomplete and persist the new progress.
    ///
    /// `completed_at` is stamped on false -> true, kept on true -> true and
    /// cleared on -> false.
    pub async fn toggle(
        &self,
        caller: Option<&Identity>,
        project_milestone_id: Uuid,
        completed: bool,
    ) -> PlatformResult<ProgressUpdate> {
        let (mut milestone, project) = self.owned_milestone(caller, project_milestone_id).await?;

        if completed && !milestone.completed {
            milestone.completed_at = Some(Utc::now());
        } else if !completed {
            milestone.completed_at = None;
        }
        milestone.completed = completed;

        let percent = self.store.save_milestone_progress(&milestone).await?;
        metrics::record_milestone_toggle();

        tracing::info!(
            project_id = %project.id,
            project_milestone_id = %milestone.id,
            completed = completed,
            progress_percent = percent,
            "Milestone toggled"
        );

        Ok(ProgressUpdate {
            milestone,
            progress_percent: percent,
        })
    }

    /// Replace a milestone's notes. Progress is untouched.
    pub async fn update_notes(
        &self,
        caller: Option<&Identity>,
        project_milestone_id: Uuid,
        notes: &str,
    ) -> PlatformResult<ProjectMilestone> {
        let (mut milestone, _) = self.owned_milestone(caller, project_milestone_id).await?;
        self.store
            .update_milestone_notes(milestone.id, notes)
            .await?;
        milestone.notes = notes.to_string();
        Ok(milestone)
    }

    /// Progress derived from the stored milestone rows.
    pub async fn compute_progress(&self, project_id: Uuid) -> PlatformResult<u8> {
        if self.store.get_project(project_id).await?.is_none() {
            return Err(PlatformError::not_found("Project", project_id));
        }
        let milestones = self.store.list_project_milestones(project_id).await?;
        let done = milestones.iter().filter(|pm| pm.completed).count();
        Ok(progress_percent(done, milestones.len()))
    }

    /// Recompute and persist a project's progress.
    pub async fn recompute(&self, project_id: Uuid) -> PlatformResult<u8> {
        let percent = self.compute_progress(project_id).await?;
        self.store.set_progress(project_id, percent).await?;
        tracing::debug!(project_id = %project_id, progress_percent = percent, "Progress recomputed");
        Ok(percent)
    }
}
