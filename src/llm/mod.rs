//! LLM integration for launchpad.
//!
//! Provides the text-generation collaborator used by the content generator
//! and the TTL response cache that sits in front of it.
//!
//! ```ignore
//! use launchpad::llm::{LiteLlmClient, LlmProvider};
//!
//! let client = LiteLlmClient::from_env()?;
//! let text = client.complete(client.default_model(), "Suggest 3 ideas", 0.7).await?;
//! ```

pub mod cache;
pub mod litellm;

pub use cache::{CacheEntry, ResponseCache, DEFAULT_TTL_MS};
pub use litellm::{
    Choice, GenerationRequest, GenerationResponse, LiteLlmClient, LlmProvider, Message, Usage,
    DEFAULT_API_BASE, DEFAULT_MODEL,
};
