//! AI-assisted content for the student workspace.
//!
//! [`ContentGenerator`] turns four fixed prompts into typed results, serving
//! repeats from the response cache and degrading to static defaults when the
//! text-generation service misbehaves.

pub mod generator;
pub mod types;

pub use generator::{keys, ContentGenerator, Operation, DEFAULT_GENERATION_TIMEOUT};
pub use types::{
    ContentSchema, Generated, MilestoneDraft, MilestoneHelp, PortfolioBlurb, ProjectIdea,
};
