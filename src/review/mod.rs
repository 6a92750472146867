//! Mentor review, verification and portfolio publication.

pub mod engine;
pub mod policy;
pub mod publisher;

pub use engine::{FirstAvailableMentor, MentorAssigner, ReviewEngine, SubmitOutcome};
pub use policy::{VerificationPolicy, MIN_CHECKS_PASSED, MIN_RATING};
pub use publisher::{PortfolioPublisher, PublicPortfolio};
