//! Portfolio publication and the public portfolio view.
//!
//! A Portfolio is a point-in-time snapshot: the owner's reliability score and
//! the mentor's comments are copied at publication and never refreshed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{PlatformError, PlatformResult};
use crate::metrics;
use crate::projects::lifecycle::ProjectLifecycle;
use crate::projects::models::{Portfolio, ProjectStatus};
use crate::storage::Store;

/// What the public portfolio page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicPortfolio {
    pub public_slug: String,
    pub title: String,
    pub short_summary: String,
    pub owner_name: String,
    pub launch_pack_title: Option<String>,
    pub public_url: String,
    pub mentor_comment: String,
    pub reliability_score_snapshot: f64,
    pub verified_badge: bool,
    pub published_at: DateTime<Utc>,
}

pub struct PortfolioPublisher {
    store: Arc<dyn Store>,
    app_url: String,
    lifecycle: ProjectLifecycle,
}

impl PortfolioPublisher {
    /// `app_url` is the base for public links, e.g. `https://launchpad.dev`.
    pub fn new(store: Arc<dyn Store>, app_url: impl Into<String>) -> Self {
        Self {
            store,
            app_url: app_url.into().trim_end_matches('/').to_string(),
            lifecycle: ProjectLifecycle::new(),
        }
    }

    pub fn public_url(&self, public_slug: &str) -> String {
        format!("{}/portfolio/{}", self.app_url, public_slug)
    }

    /// Snapshot a verified project into a Portfolio and make sure the
    /// project is `verified`.
    ///
    /// Does not check for an existing Portfolio; the store rejects a second
    /// one with a conflict.
    pub async fn publish(&self, project_id: Uuid, review_id: Uuid) -> PlatformResult<Portfolio> {
        let mut project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Project", project_id))?;
        let review = self
            .store
            .get_review(review_id)
            .await?
            .filter(|r| r.project_id == project.id)
            .ok_or_else(|| {
                PlatformError::NotFound(format!(
                    "Review '{}' for project '{}'",
                    review_id, project_id
                ))
            })?;

        if !review.verified {
            return Err(PlatformError::InvalidTransition {
                from: project.status.to_string(),
                to: ProjectStatus::Verified.to_string(),
            });
        }

        let owner = self
            .store
            .get_user(project.owner_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("User", project.owner_id))?;

        let portfolio = Portfolio {
            id: Uuid::new_v4(),
            project_id: project.id,
            public_url: self.public_url(&project.public_slug),
            mentor_comment: review.comments.clone(),
            reliability_score_snapshot: owner.reliability_score,
            verified_badge: true,
            created_at: Utc::now(),
        };

        let previous = project.status;
        self.lifecycle
            .transition(&mut project, ProjectStatus::Verified)?;
        self.store.insert_portfolio(&portfolio).await?;
        if previous != project.status {
            self.store
                .update_project_status(project.id, project.status)
                .await?;
        }

        metrics::record_portfolio_published();
        tracing::info!(
            project_id = %project.id,
            portfolio_id = %portfolio.id,
            public_url = %portfolio.public_url,
            "Portfolio published"
        );

        Ok(portfolio)
    }

    /// Public page data for a project slug.
    ///
    /// `NotFound` unless the project has a Portfolio carrying the verified badge.
    pub async fn public_view(&self, public_slug: &str) -> PlatformResult<PublicPortfolio> {
        let not_found = || PlatformError::not_found("Portfolio", public_slug);

        let project = self
            .store
            .get_project_by_slug(public_slug)
            .await?
            .ok_or_else(not_found)?;
        let portfolio = self
            .store
            .get_portfolio_by_project(project.id)
            .await?
            .filter(|p| p.verified_badge)
            .ok_or_else(not_found)?;
        let owner_name = self
            .store
            .get_user(project.owner_id)
            .await?
            .map(|u| u.name)
            .unwrap_or_default();
        let launch_pack_title = self
            .store
            .get_launch_pack(project.launch_pack_id)
            .await?
            .map(|p| p.title);

        Ok(PublicPortfolio {
            public_slug: project.public_slug,
            title: project.title,
            short_summary: project.short_summary,
            owner_name,
            launch_pack_title,
            public_url: portfolio.public_url,
            mentor_comment: portfolio.mentor_comment,
            reliability_score_snapshot: portfolio.reliability_score_snapshot,
            verified_badge: portfolio.verified_badge,
            published_at: portfolio.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::models::{Project, Review, ReviewChecklist, Role, User};
    use crate::storage::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        owner: User,
        project: Project,
        review: Review,
    }

    async fn fixture(status: ProjectStatus, verified: bool) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let mut owner = User::new("kim@example.com", "Kim Lee", Role::Student);
        owner.reliability_score = 0.8;
        let mentor = User::new("mo@example.com", "Mo", Role::Mentor);
        store.upsert_user(&owner).await.unwrap();
        store.upsert_user(&mentor).await.unwrap();

        let project = Project {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            launch_pack_id: Uuid::new_v4(),
            title: "Iris Classifier - kim".to_string(),
            short_summary: "Building Iris Classifier".to_string(),
            status,
            progress_percent: 100,
            public_slug: "iris-classifier-kim-abc".to_string(),
            started_at: Utc::now(),
        };
        store.insert_project(&project, &[]).await.unwrap();

        let mut review = Review::assigned(project.id, mentor.id);
        review.checklist = ReviewChecklist::new(true, true, true, verified);
        review.rating = Some(4);
        review.comments = "Solid work".to_string();
        review.verified = verified;
        review.submitted_at = Some(Utc::now());
        store.insert_review(&review).await.unwrap();

        Fixture {
            store,
            owner,
            project,
            review,
        }
    }

    #[tokio::test]
    async fn test_publish_snapshots_and_verifies() {
        let f = fixture(ProjectStatus::InReview, true).await;
        let publisher = PortfolioPublisher::new(f.store.clone(), "https://launchpad.dev/");

        let portfolio = publisher.publish(f.project.id, f.review.id).await.unwrap();
        assert_eq!(
            portfolio.public_url,
            "https://launchpad.dev/portfolio/iris-classifier-kim-abc"
        );
        assert_eq!(portfolio.mentor_comment, "Solid work");
        assert_eq!(portfolio.reliability_score_snapshot, 0.8);
        assert!(portfolio.verified_badge);

        let project = f.store.get_project(f.project.id).await.unwrap().unwrap();
        assert_eq!(project.status, ProjectStatus::Verified);
    }

    #[tokio::test]
    async fn test_snapshot_survives_score_change() {
        let f = fixture(ProjectStatus::InReview, true).await;
        let publisher = PortfolioPublisher::new(f.store.clone(), "http://localhost:3000");
        publisher.publish(f.project.id, f.review.id).await.unwrap();

        f.store.set_reliability_score(f.owner.id, 0.1).await.unwrap();

        let view = publisher.public_view(&f.project.public_slug).await.unwrap();
        assert_eq!(view.reliability_score_snapshot, 0.8);
        assert_eq!(view.owner_name, "Kim Lee");
    }

    #[tokio::test]
    async fn test_publish_rejects_unverified_review() {
        let f = fixture(ProjectStatus::InReview, false).await;
        let publisher = PortfolioPublisher::new(f.store.clone(), "http://localhost:3000");

        let err = publisher
            .publish(f.project.id, f.review.id)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::InvalidTransition { .. }));
        assert!(f
            .store
            .get_portfolio_by_project(f.project.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_publish_mismatched_review_is_not_found() {
        let f = fixture(ProjectStatus::InReview, true).await;
        let other = fixture(ProjectStatus::InReview, true).await;
        let publisher = PortfolioPublisher::new(f.store.clone(), "http://localhost:3000");

        let err = publisher
            .publish(f.project.id, other.review.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_second_publish_conflicts() {
        let f = fixture(ProjectStatus::InReview, true).await;
        let publisher = PortfolioPublisher::new(f.store.clone(), "http://localhost:3000");
        publisher.publish(f.project.id, f.review.id).await.unwrap();

        let err = publisher
            .publish(f.project.id, f.review.id)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_public_view_requires_portfolio() {
        let f = fixture(ProjectStatus::InReview, true).await;
        let publisher = PortfolioPublisher::new(f.store.clone(), "http://localhost:3000");

        let err = publisher
            .public_view(&f.project.public_slug)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let err = publisher.public_view("no-such-slug").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
