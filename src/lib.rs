//! launchpad: student project tracking from launch pack to verified portfolio.
//!
//! Students start projects from launch packs, complete milestones, and request
//! mentor review. A passing review verifies the project and publishes a
//! portfolio snapshot. AI-assisted content is served through a TTL cache in
//! front of an OpenAI-compatible endpoint.

pub mod assistant;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod metrics;
pub mod projects;
pub mod prompts;
pub mod review;
pub mod storage;
pub mod utils;

// Re-export commonly used error types
pub use error::{CacheError, GenerationError, LlmError, PlatformError, PlatformResult};
