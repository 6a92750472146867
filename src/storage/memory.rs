//! In-process [`Store`] used by tests and the `--memory` CLI mode.
//!
//! All tables live behind one lock, so every multi-row write is atomic with
//! respect to concurrent readers.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::llm::cache::CacheEntry;
use crate::projects::models::{
    LaunchPack, Milestone, Portfolio, Project, ProjectMilestone, ProjectStatus, Review, Role,
    User,
};
use crate::projects::progress::progress_percent;

use super::schema::tables::{PROJECTS, PROJECT_MILESTONES, REVIEWS, USERS};
use super::store::{PlatformStats, StorageError, Store, StoreResult};

fn missing(table: &str, id: Uuid) -> StorageError {
    StorageError::NotFound(format!("{}.id '{}'", table, id))
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    launch_packs: HashMap<Uuid, LaunchPack>,
    milestones: HashMap<Uuid, Milestone>,
    projects: HashMap<Uuid, Project>,
    project_milestones: HashMap<Uuid, ProjectMilestone>,
    reviews: Vec<Review>,
    portfolios: HashMap<Uuid, Portfolio>,
    ai_cache: HashMap<String, CacheEntry>,
}

/// Memory-backed store.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StorageError::Backend("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StorageError::Backend("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.write()?;
        if tables
            .users
            .iter()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(StorageError::Conflict(format!("users.email '{}'", user.email)));
        }
        match tables.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => tables.users.push(user.clone()),
        }
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users_by_role(&self, role: Role) -> StoreResult<Vec<User>> {
        Ok(self
            .read()?
            .users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn set_reliability_score(&self, user_id: Uuid, score: f64) -> StoreResult<()> {
        let mut tables = self.write()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| missing(USERS, user_id))?;
        user.reliability_score = score;
        Ok(())
    }

    async fn upsert_launch_pack(
        &self,
        pack: &LaunchPack,
        milestones: &[Milestone],
    ) -> StoreResult<()> {
        let mut tables = self.write()?;
        let existing_id = tables
            .launch_packs
            .values()
            .find(|p| p.slug == pack.slug)
            .map(|p| p.id);
        if let Some(id) = existing_id {
            if id != pack.id {
                return Err(StorageError::Conflict(format!(
                    "launch_packs.slug '{}' belongs to another pack",
                    pack.slug
                )));
            }
        }
        tables.launch_packs.insert(pack.id, pack.clone());
        for milestone in milestones {
            tables.milestones.insert(milestone.id, milestone.clone());
        }
        Ok(())
    }

    async fn get_launch_pack(&self, id: Uuid) -> StoreResult<Option<LaunchPack>> {
        Ok(self.read()?.launch_packs.get(&id).cloned())
    }

    async fn get_launch_pack_by_slug(&self, slug: &str) -> StoreResult<Option<LaunchPack>> {
        Ok(self
            .read()?
            .launch_packs
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn list_launch_packs(&self) -> StoreResult<Vec<LaunchPack>> {
        let mut packs: Vec<LaunchPack> = self.read()?.launch_packs.values().cloned().collect();
        packs.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(packs)
    }

    async fn list_milestones(&self, launch_pack_id: Uuid) -> StoreResult<Vec<Milestone>> {
        let mut milestones: Vec<Milestone> = self
            .read()?
            .milestones
            .values()
            .filter(|m| m.launch_pack_id == launch_pack_id)
            .cloned()
            .collect();
        milestones.sort_by_key(|m| m.order_index);
        Ok(milestones)
    }

    async fn insert_project(
        &self,
        project: &Project,
        milestones: &[ProjectMilestone],
    ) -> StoreResult<()> {
        let mut tables = self.write()?;
        if tables.projects.contains_key(&project.id) {
            return Err(StorageError::Conflict(format!("projects.id '{}'", project.id)));
        }
        if tables
            .projects
            .values()
            .any(|p| p.public_slug == project.public_slug)
        {
            return Err(StorageError::Conflict(format!(
                "projects.public_slug '{}'",
                project.public_slug
            )));
        }
        tables.projects.insert(project.id, project.clone());
        for pm in milestones {
            tables.project_milestones.insert(pm.id, pm.clone());
        }
        Ok(())
    }

    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.read()?.projects.get(&id).cloned())
    }

    async fn get_project_by_slug(&self, slug: &str) -> StoreResult<Option<Project>> {
        Ok(self
            .read()?
            .projects
            .values()
            .find(|p| p.public_slug == slug)
            .cloned())
    }

    async fn list_projects_for_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .read()?
            .projects
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(projects)
    }

    async fn update_project_status(&self, id: Uuid, status: ProjectStatus) -> StoreResult<()> {
        let mut tables = self.write()?;
        let project = tables
            .projects
            .get_mut(&id)
            .ok_or_else(|| missing(PROJECTS, id))?;
        project.status = status;
        Ok(())
    }

    async fn set_progress(&self, project_id: Uuid, progress_percent: u8) -> StoreResult<()> {
        let mut tables = self.write()?;
        let project = tables
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| missing(PROJECTS, project_id))?;
        project.progress_percent = progress_percent;
        Ok(())
    }

    async fn get_project_milestone(&self, id: Uuid) -> StoreResult<Option<ProjectMilestone>> {
        Ok(self.read()?.project_milestones.get(&id).cloned())
    }

    async fn list_project_milestones(
        &self,
        project_id: Uuid,
    ) -> StoreResult<Vec<ProjectMilestone>> {
        let tables = self.read()?;
        let mut rows: Vec<(i32, ProjectMilestone)> = tables
            .project_milestones
            .values()
            .filter(|pm| pm.project_id == project_id)
            .map(|pm| {
                let order = tables
                    .milestones
                    .get(&pm.milestone_id)
                    .map(|m| m.order_index)
                    .unwrap_or(i32::MAX);
                (order, pm.clone())
            })
            .collect();
        rows.sort_by_key(|(order, _)| *order);
        Ok(rows.into_iter().map(|(_, pm)| pm).collect())
    }

    async fn save_milestone_progress(&self, milestone: &ProjectMilestone) -> StoreResult<u8> {
        let mut tables = self.write()?;
        if !tables.projects.contains_key(&milestone.project_id) {
            return Err(missing(PROJECTS, milestone.project_id));
        }
        let stored = tables
            .project_milestones
            .get_mut(&milestone.id)
            .filter(|pm| pm.project_id == milestone.project_id)
            .ok_or_else(|| missing(PROJECT_MILESTONES, milestone.id))?;
        stored.completed = milestone.completed;
        stored.completed_at = milestone.completed_at;

        let (done, total) = tables
            .project_milestones
            .values()
            .filter(|pm| pm.project_id == milestone.project_id)
            .fold((0, 0), |(done, total), pm| {
                (done + usize::from(pm.completed), total + 1)
            });
        let percent = progress_percent(done, total);
        if let Some(project) = tables.projects.get_mut(&milestone.project_id) {
            project.progress_percent = percent;
        }
        Ok(percent)
    }

    async fn update_milestone_notes(&self, id: Uuid, notes: &str) -> StoreResult<()> {
        let mut tables = self.write()?;
        let pm = tables
            .project_milestones
            .get_mut(&id)
            .ok_or_else(|| missing(PROJECT_MILESTONES, id))?;
        pm.notes = notes.to_string();
        Ok(())
    }

    async fn insert_review(&self, review: &Review) -> StoreResult<()> {
        let mut tables = self.write()?;
        if tables.reviews.iter().any(|r| r.id == review.id) {
            return Err(StorageError::Conflict(format!("reviews.id '{}'", review.id)));
        }
        tables.reviews.push(review.clone());
        Ok(())
    }

    async fn get_review(&self, id: Uuid) -> StoreResult<Option<Review>> {
        Ok(self.read()?.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn save_review(&self, review: &Review) -> StoreResult<()> {
        let mut tables = self.write()?;
        let existing = tables
            .reviews
            .iter_mut()
            .find(|r| r.id == review.id)
            .ok_or_else(|| missing(REVIEWS, review.id))?;
        *existing = review.clone();
        Ok(())
    }

    async fn list_reviews_for_mentor(&self, mentor_id: Uuid) -> StoreResult<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .read()?
            .reviews
            .iter()
            .filter(|r| r.mentor_id == mentor_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn list_reviews_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Review>> {
        Ok(self
            .read()?
            .reviews
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn insert_portfolio(&self, portfolio: &Portfolio) -> StoreResult<()> {
        let mut tables = self.write()?;
        if tables.portfolios.contains_key(&portfolio.project_id) {
            return Err(StorageError::Conflict(format!(
                "portfolios.project_id '{}'",
                portfolio.project_id
            )));
        }
        tables
            .portfolios
            .insert(portfolio.project_id, portfolio.clone());
        Ok(())
    }

    async fn get_portfolio_by_project(&self, project_id: Uuid) -> StoreResult<Option<Portfolio>> {
        Ok(self.read()?.portfolios.get(&project_id).cloned())
    }

    async fn get_cache_entry(&self, key: &str) -> StoreResult<Option<CacheEntry>> {
        Ok(self.read()?.ai_cache.get(key).cloned())
    }

    async fn upsert_cache_entry(&self, entry: &CacheEntry) -> StoreResult<()> {
        self.write()?
            .ai_cache
            .insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    async fn delete_cache_entry(&self, key: &str) -> StoreResult<()> {
        self.write()?.ai_cache.remove(key);
        Ok(())
    }

    async fn platform_stats(&self) -> StoreResult<PlatformStats> {
        let tables = self.read()?;
        Ok(PlatformStats {
            users: tables.users.len() as u64,
            projects: tables.projects.len() as u64,
            verified_projects: tables
                .projects
                .values()
                .filter(|p| p.status == ProjectStatus::Verified)
                .count() as u64,
            launch_packs: tables.launch_packs.len() as u64,
        })
    }
}
