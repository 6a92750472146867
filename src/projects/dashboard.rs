//! Platform-wide counts for the admin dashboard.

use std::sync::Arc;

use crate::error::{PlatformError, PlatformResult};
use crate::projects::authenticated;
use crate::projects::models::{Identity, Role};
use crate::storage::{PlatformStats, Store};

pub struct AdminDashboard {
    store: Arc<dyn Store>,
}

impl AdminDashboard {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Users, projects, verified projects and launch packs. Admin only.
    pub async fn stats(&self, caller: Option<&Identity>) -> PlatformResult<PlatformStats> {
        let caller = authenticated(caller)?;
        if caller.role != Role::Admin {
            return Err(PlatformError::Forbidden(
                "only admins may view platform statistics".to_string(),
            ));
        }

        let stats = self.store.platform_stats().await?;
        tracing::debug!(
            users = stats.users,
            projects = stats.projects,
            verified_projects = stats.verified_projects,
            launch_packs = stats.launch_packs,
            "Platform stats read"
        );
        Ok(stats)
    }
}
