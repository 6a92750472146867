//! Review requests, mentor submissions and the verification pipeline.
//!
//! A passing submission moves the project to `verified` first and publishes
//! the Portfolio second. If publication fails in between, the project stays
//! `verified` without a Portfolio until an admin calls
//! [`ReviewEngine::republish`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{PlatformError, PlatformResult};
use crate::metrics;
use crate::projects::authenticated;
use crate::projects::lifecycle::{ProjectLifecycle, TransitionOutcome};
use crate::projects::models::{
    Identity, Portfolio, Project, ProjectStatus, Review, ReviewChecklist, Role,
};
use crate::review::policy::VerificationPolicy;
use crate::review::publisher::PortfolioPublisher;
use crate::storage::Store;

/// Chooses the mentor for a new review.
#[async_trait]
pub trait MentorAssigner: Send + Sync {
    /// `None` when nobody can take the review.
    async fn pick(&self, project: &Project) -> PlatformResult<Option<Uuid>>;
}

/// Picks the first mentor the store returns. No load balancing and no
/// matching on skills.
pub struct FirstAvailableMentor {
    store: Arc<dyn Store>,
}

impl FirstAvailableMentor {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MentorAssigner for FirstAvailableMentor {
    async fn pick(&self, project: &Project) -> PlatformResult<Option<Uuid>> {
        let mentors = self.store.list_users_by_role(Role::Mentor).await?;
        Ok(mentors
            .into_iter()
            .find(|m| m.id != project.owner_id)
            .map(|m| m.id))
    }
}

/// Result of a mentor submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub verified: bool,
    /// Set when this submission published the Portfolio.
    pub portfolio: Option<Portfolio>,
}

pub struct ReviewEngine {
    store: Arc<dyn Store>,
    assigner: Arc<dyn MentorAssigner>,
    publisher: PortfolioPublisher,
    policy: VerificationPolicy,
    lifecycle: ProjectLifecycle,
}

impl ReviewEngine {
    pub fn new(store: Arc<dyn Store>, app_url: impl Into<String>) -> Self {
        Self {
            assigner: Arc::new(FirstAvailableMentor::new(store.clone())),
            publisher: PortfolioPublisher::new(store.clone(), app_url),
            store,
            policy: VerificationPolicy,
            lifecycle: ProjectLifecycle::new(),
        }
    }

    pub fn with_assigner(mut self, assigner: Arc<dyn MentorAssigner>) -> Self {
        self.assigner = assigner;
        self
    }

    pub fn publisher(&self) -> &PortfolioPublisher {
        &self.publisher
    }

    async fn load_project(&self, project_id: Uuid) -> PlatformResult<Project> {
        self.store
            .get_project(project_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Project", project_id))
    }

    /// Move an `in_progress` project to `in_review` and assign a mentor.
    ///
    /// Owner only. Fails with `NotFound` before touching the project when no
    /// mentor is available.
    pub async fn request_review(
        &self,
        caller: Option<&Identity>,
        project_id: Uuid,
    ) -> PlatformResult<Review> {
        let caller = authenticated(caller)?;
        let mut project = self.load_project(project_id).await?;
        if project.owner_id != caller.user_id {
            return Err(PlatformError::Forbidden(
                "only the project owner may request a review".to_string(),
            ));
        }
        self.lifecycle
            .check(project.status, ProjectStatus::InReview)?;

        let mentor_id = self
            .assigner
            .pick(&project)
            .await?
            .ok_or_else(|| PlatformError::NotFound("No mentor available".to_string()))?;

        self.lifecycle
            .transition(&mut project, ProjectStatus::InReview)?;
        self.store
            .update_project_status(project.id, project.status)
            .await?;

        let review = Review::assigned(project.id, mentor_id);
        self.store.insert_review(&review).await?;

        tracing::info!(
            project_id = %project.id,
            review_id = %review.id,
            mentor_id = %mentor_id,
            "Review requested"
        );
        Ok(review)
    }

    /// Record a mentor's verdict and, when it passes, verify and publish.
    ///
    /// A failing review leaves the project `in_review` and may be submitted
    /// again. Once a review has passed its verdict is final: later
    /// submissions write nothing and report the project as verified, only
    /// finishing a verification or publication that was interrupted.
    pub async fn submit_review(
        &self,
        caller: Option<&Identity>,
        review_id: Uuid,
        checklist: ReviewChecklist,
        rating: u8,
        comments: &str,
    ) -> PlatformResult<SubmitOutcome> {
        let caller = authenticated(caller)?;
        let mut review = self
            .store
            .get_review(review_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Review", review_id))?;
        if review.mentor_id != caller.user_id {
            return Err(PlatformError::Forbidden(
                "only the assigned mentor may submit this review".to_string(),
            ));
        }
        if !self.policy.is_valid_rating(rating) {
            return Err(PlatformError::InvalidInput(format!(
                "rating must be between 1 and 5, got {}",
                rating
            )));
        }

        let mut project = self.load_project(review.project_id).await?;
        if review.verified || project.status == ProjectStatus::Verified {
            tracing::info!(
                review_id = %review.id,
                project_id = %project.id,
                "Review already verified, keeping the recorded verdict"
            );
            let portfolio = if review.verified {
                self.finish_verification(&mut project, &review).await?
            } else {
                None
            };
            return Ok(SubmitOutcome {
                verified: true,
                portfolio,
            });
        }

        let verified = self.policy.evaluate(&checklist, rating);
        review.checklist = checklist;
        review.rating = Some(rating);
        review.comments = comments.to_string();
        review.verified = verified;
        review.submitted_at = Some(Utc::now());
        self.store.save_review(&review).await?;
        metrics::record_review_submitted(verified);

        tracing::info!(
            review_id = %review.id,
            project_id = %review.project_id,
            checks_passed = review.checklist.passed_count(),
            rating = rating,
            verified = verified,
            "Review submitted"
        );

        if !verified {
            return Ok(SubmitOutcome {
                verified,
                portfolio: None,
            });
        }

        let portfolio = self.finish_verification(&mut project, &review).await?;
        Ok(SubmitOutcome {
            verified,
            portfolio,
        })
    }

    /// Move the project to `verified` and publish its Portfolio, skipping
    /// whichever step is already done. Returns the Portfolio if one was
    /// published now.
    async fn finish_verification(
        &self,
        project: &mut Project,
        review: &Review,
    ) -> PlatformResult<Option<Portfolio>> {
        if self
            .lifecycle
            .transition(project, ProjectStatus::Verified)?
            == TransitionOutcome::Applied
        {
            self.store
                .update_project_status(project.id, project.status)
                .await?;
            tracing::info!(project_id = %project.id, review_id = %review.id, "Project verified");
        }

        match self.store.get_portfolio_by_project(project.id).await? {
            Some(_) => {
                tracing::debug!(project_id = %project.id, "Portfolio already published");
                Ok(None)
            }
            None => Ok(Some(self.publisher.publish(project.id, review.id).await?)),
        }
    }

    /// Publish the Portfolio for a verified project that lacks one.
    ///
    /// Admin only. Uses the most recent passing review.
    pub async fn republish(
        &self,
        caller: Option<&Identity>,
        project_id: Uuid,
    ) -> PlatformResult<Portfolio> {
        let caller = authenticated(caller)?;
        if caller.role != Role::Admin {
            return Err(PlatformError::Forbidden(
                "only admins may republish portfolios".to_string(),
            ));
        }

        let project = self.load_project(project_id).await?;
        if project.status != ProjectStatus::Verified {
            return Err(PlatformError::InvalidTransition {
                from: project.status.to_string(),
                to: ProjectStatus::Verified.to_string(),
            });
        }
        if self
            .store
            .get_portfolio_by_project(project.id)
            .await?
            .is_some()
        {
            return Err(PlatformError::Conflict(format!(
                "project '{}' already has a portfolio",
                project.id
            )));
        }

        let review = self
            .store
            .list_reviews_for_project(project.id)
            .await?
            .into_iter()
            .filter(|r| r.verified)
            .max_by_key(|r| r.submitted_at)
            .ok_or_else(|| {
                PlatformError::NotFound(format!("Verified review for project '{}'", project.id))
            })?;

        tracing::warn!(project_id = %project.id, review_id = %review.id, "Republishing portfolio");
        self.publisher.publish(project.id, review.id).await
    }

    /// Reviews assigned to the calling mentor.
    pub async fn reviews_for_mentor(&self, caller: Option<&Identity>) -> PlatformResult<Vec<Review>> {
        let caller = authenticated(caller)?;
        if caller.role == Role::Student {
            return Err(PlatformError::Forbidden(
                "only mentors have assigned reviews".to_string(),
            ));
        }
        Ok(self.store.list_reviews_for_mentor(caller.user_id).await?)
    }
}
