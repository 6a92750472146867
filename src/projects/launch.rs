use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{PlatformError, PlatformResult};
use crate::projects::models::{Identity, Project, ProjectMilestone, ProjectStatus};
use crate::projects::{authenticated, slug};
use crate::storage::Store;

/// Creates projects from launch packs.
pub struct ProjectLauncher {
    store: Arc<dyn Store>,
}

impl ProjectLauncher {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Start a project for the caller from a launch pack.
    ///
    /// The project and one pending ProjectMilestone per template milestone
    /// are written together; the milestone set never changes afterwards.
    pub async fn start(
        &self,
        caller: Option<&Identity>,
        launch_pack_id: Uuid,
    ) -> PlatformResult<Project> {
        let caller = authenticated(caller)?;

        let owner = self
            .store
            .get_user(caller.user_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("User", caller.user_id))?;
        let pack = self
            .store
            .get_launch_pack(launch_pack_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Launch pack", launch_pack_id))?;
        let milestones = self.store.list_milestones(pack.id).await?;

        let started_at = Utc::now();
        let title = format!("{} - {}", pack.title, owner.handle());
        let project = Project {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            launch_pack_id: pack.id,
            public_slug: slug::project_slug(&title, started_at),
            short_summary: format!("Building {}", pack.title),
            title,
            status: ProjectStatus::InProgress,
            progress_percent: 0,
            started_at,
        };
        let project_milestones: Vec<ProjectMilestone> = milestones
            .iter()
            .map(|m| ProjectMilestone::pending(project.id, m.id))
            .collect();

        self.store
            .insert_project(&project, &project_milestones)
            .await?;

        tracing::info!(
            project_id = %project.id,
            owner_id = %owner.id,
            launch_pack = %pack.slug,
            milestones = project_milestones.len(),
            "Project started"
        );

        Ok(project)
    }

    /// Projects owned by the caller, newest first.
    pub async fn my_projects(&self, caller: Option<&Identity>) -> PlatformResult<Vec<Project>> {
        let caller = authenticated(caller)?;
        Ok(self.store.list_projects_for_owner(caller.user_id).await?)
    }
}
