//! Projects: the data model, the status lifecycle, project start,
//! milestone progress tracking and the admin counts.

pub mod dashboard;
pub mod launch;
pub mod lifecycle;
pub mod models;
pub mod progress;
pub mod slug;

pub use dashboard::AdminDashboard;
pub use launch::ProjectLauncher;
pub use lifecycle::{ProjectLifecycle, TransitionOutcome};
pub use models::{
    Identity, LaunchPack, Milestone, Portfolio, Project, ProjectMilestone, ProjectStatus, Review,
    ReviewChecklist, Role, User,
};
pub use progress::{progress_percent, ProgressTracker, ProgressUpdate};
pub use slug::generate_slug;

use crate::error::{PlatformError, PlatformResult};

/// Reject anonymous callers.
pub(crate) fn authenticated(caller: Option<&Identity>) -> PlatformResult<&Identity> {
    caller.ok_or(PlatformError::Unauthorized)
}
