//! The data-store collaborator.
//!
//! Components never hold a global client: an `Arc<dyn Store>` is passed into
//! each of them, so tests can substitute [`super::MemoryStore`] for the
//! PostgreSQL-backed [`super::PgStore`]. Access control is enforced by the
//! calling component, never by the store.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::llm::cache::CacheEntry;
use crate::projects::models::{
    LaunchPack, Milestone, Portfolio, Project, ProjectMilestone, ProjectStatus, Review, Role,
    User,
};

/// Errors that can occur inside a store implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend failed (connection, query, lock).
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// An update targeted a row that does not exist.
    #[error("Row not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint was violated.
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// A stored value could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored column held a value outside its domain.
    #[error("Corrupt row in '{table}': {message}")]
    CorruptRow { table: String, message: String },
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::Conflict(db.message().to_string())
            }
            _ => StorageError::Backend(err.to_string()),
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StorageError>;

/// Row counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlatformStats {
    pub users: u64,
    pub projects: u64,
    pub verified_projects: u64,
    pub launch_packs: u64,
}

/// Typed row-level operations over every persisted entity.
///
/// Updates addressed by id fail with [`StorageError::NotFound`] when no row
/// matches.
#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn upsert_user(&self, user: &User) -> StoreResult<()>;
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn list_users_by_role(&self, role: Role) -> StoreResult<Vec<User>>;
    async fn set_reliability_score(&self, user_id: Uuid, score: f64) -> StoreResult<()>;

    // Launch packs
    /// Insert or replace a launch pack (keyed by slug) together with its milestones.
    async fn upsert_launch_pack(
        &self,
        pack: &LaunchPack,
        milestones: &[Milestone],
    ) -> StoreResult<()>;
    async fn get_launch_pack(&self, id: Uuid) -> StoreResult<Option<LaunchPack>>;
    async fn get_launch_pack_by_slug(&self, slug: &str) -> StoreResult<Option<LaunchPack>>;
    async fn list_launch_packs(&self) -> StoreResult<Vec<LaunchPack>>;
    /// Milestones of a pack, ordered by `order_index` ascending.
    async fn list_milestones(&self, launch_pack_id: Uuid) -> StoreResult<Vec<Milestone>>;

    // Projects
    /// Insert a project and its complete milestone set in one transaction.
    async fn insert_project(
        &self,
        project: &Project,
        milestones: &[ProjectMilestone],
    ) -> StoreResult<()>;
    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>>;
    async fn get_project_by_slug(&self, slug: &str) -> StoreResult<Option<Project>>;
    async fn list_projects_for_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Project>>;
    async fn update_project_status(&self, id: Uuid, status: ProjectStatus) -> StoreResult<()>;
    async fn set_progress(&self, project_id: Uuid, progress_percent: u8) -> StoreResult<()>;

    // Project milestones
    async fn get_project_milestone(&self, id: Uuid) -> StoreResult<Option<ProjectMilestone>>;
    async fn list_project_milestones(&self, project_id: Uuid)
        -> StoreResult<Vec<ProjectMilestone>>;
    /// Write a milestone's completion state, then recount its project's
    /// `progress_percent` from the stored rows in the same transaction.
    /// Returns the percent that was stored.
    async fn save_milestone_progress(&self, milestone: &ProjectMilestone) -> StoreResult<u8>;
    async fn update_milestone_notes(&self, id: Uuid, notes: &str) -> StoreResult<()>;

    // Reviews
    async fn insert_review(&self, review: &Review) -> StoreResult<()>;
    async fn get_review(&self, id: Uuid) -> StoreResult<Option<Review>>;
    async fn save_review(&self, review: &Review) -> StoreResult<()>;
    async fn list_reviews_for_mentor(&self, mentor_id: Uuid) -> StoreResult<Vec<Review>>;
    async fn list_reviews_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Review>>;

    // Portfolios
    /// Fails with [`StorageError::Conflict`] if the project already has one.
    async fn insert_portfolio(&self, portfolio: &Portfolio) -> StoreResult<()>;
    async fn get_portfolio_by_project(&self, project_id: Uuid) -> StoreResult<Option<Portfolio>>;

    // AI response cache
    async fn get_cache_entry(&self, key: &str) -> StoreResult<Option<CacheEntry>>;
    /// Insert or overwrite by key.
    async fn upsert_cache_entry(&self, entry: &CacheEntry) -> StoreResult<()>;
    async fn delete_cache_entry(&self, key: &str) -> StoreResult<()>;

    // Admin
    async fn platform_stats(&self) -> StoreResult<PlatformStats>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Conflict("portfolios_project_id_key".to_string());
        assert!(err.to_string().contains("portfolios_project_id_key"));

        let err = StorageError::CorruptRow {
            table: "projects".to_string(),
            message: "unknown project status 'published'".to_string(),
        };
        assert!(err.to_string().contains("projects"));
    }

    #[test]
    fn test_not_found_display_names_the_row() {
        let err = StorageError::NotFound("users.id 'abc'".to_string());
        assert_eq!(err.to_string(), "Row not found: users.id 'abc'");
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_backend() {
        let err: StorageError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StorageError::Backend(_)));
    }
}
