//! Schema versioning.
//!
//! The schema is applied as the named steps of [`schema::schema_steps`].
//! Each step that runs is recorded in `schema_history` and never runs again,
//! so `launchpad migrate` can be repeated against a live database.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use thiserror::Error;

use super::schema::{self, SchemaStep};

/// Errors that can occur while applying or inspecting the schema.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Schema step '{step}' failed: {message}")]
    StepFailed { step: String, message: String },
}

/// Whether one schema step has been applied, and when.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepStatus {
    pub step: String,
    pub applied_at: Option<DateTime<Utc>>,
}

impl StepStatus {
    pub fn is_pending(&self) -> bool {
        self.applied_at.is_none()
    }
}

/// Pair every known step with its recorded time, keeping apply order.
fn step_statuses(
    steps: &[SchemaStep],
    history: &HashMap<String, DateTime<Utc>>,
) -> Vec<StepStatus> {
    steps
        .iter()
        .map(|step| StepStatus {
            step: step.name.clone(),
            applied_at: history.get(&step.name).copied(),
        })
        .collect()
}

/// Applies pending schema steps and reports which have run.
pub struct MigrationRunner {
    pool: PgPool,
}

impl MigrationRunner {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply every pending step, each in its own transaction.
    ///
    /// Returns how many steps this call applied.
    pub async fn run_migrations(&self) -> Result<usize, MigrationError> {
        let steps = schema::schema_steps();
        let statuses = self.statuses(&steps).await?;

        let mut applied = 0;
        for (step, status) in steps.iter().zip(&statuses) {
            if status.is_pending() {
                self.apply(step).await?;
                tracing::info!(step = %step.name, "Applied schema step");
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Every known step with its application time, pending steps included.
    pub async fn status(&self) -> Result<Vec<StepStatus>, MigrationError> {
        self.statuses(&schema::schema_steps()).await
    }

    async fn statuses(&self, steps: &[SchemaStep]) -> Result<Vec<StepStatus>, MigrationError> {
        self.ensure_history_table().await?;

        let rows = sqlx::query("SELECT step, applied_at FROM schema_history")
            .fetch_all(&self.pool)
            .await?;
        let history: HashMap<String, DateTime<Utc>> = rows
            .iter()
            .map(|row| (row.get("step"), row.get("applied_at")))
            .collect();

        Ok(step_statuses(steps, &history))
    }

    async fn ensure_history_table(&self) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_history (
                step TEXT PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn apply(&self, step: &SchemaStep) -> Result<(), MigrationError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(step.sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| MigrationError::StepFailed {
                step: step.name.clone(),
                message: e.to_string(),
            })?;

        sqlx::query("INSERT INTO schema_history (step) VALUES ($1)")
            .bind(&step.name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failed_names_the_step() {
        let err = MigrationError::StepFailed {
            step: "create_reviews".to_string(),
            message: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Schema step 'create_reviews' failed: syntax error"
        );
    }

    #[test]
    fn test_step_statuses_mark_pending_steps() {
        let steps = schema::schema_steps();
        let applied_at = Utc::now();
        let history: HashMap<String, DateTime<Utc>> = steps[..2]
            .iter()
            .map(|s| (s.name.clone(), applied_at))
            .chain([("create_legacy_table".to_string(), applied_at)])
            .collect();

        let statuses = step_statuses(&steps, &history);
        assert_eq!(statuses.len(), steps.len());
        assert_eq!(statuses[0].step, "create_users");
        assert_eq!(statuses[0].applied_at, Some(applied_at));
        assert!(!statuses[1].is_pending());
        assert!(statuses[2..].iter().all(StepStatus::is_pending));
    }
}
