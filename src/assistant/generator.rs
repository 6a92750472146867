//! Cached, fail-soft AI content generation.
//!
//! Every operation follows the same protocol:
//! 1. Derive a deterministic cache key from the operation and its inputs.
//! 2. Serve a cache hit directly (`cached = true`).
//! 3. On a miss, render the operation's prompt and call the text-generation
//!    service with temperature 0.7 inside the configured timeout.
//! 4. Parse the completion (direct JSON, then fenced block) into the
//!    operation's typed schema.
//! 5. Store the parsed payload; a cache write failure is logged and ignored.
//! 6. On any failure return the fallback (ideas) or an empty default plus a
//!    message.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GenerationError, LlmError};
use crate::llm::{LlmProvider, ResponseCache};
use crate::metrics;
use crate::prompts;
use crate::utils::parse_structured;

use super::types::{
    ContentSchema, Generated, MilestoneDraft, MilestoneHelp, PortfolioBlurb, ProjectIdea,
};

/// Sampling temperature for every generation call.
pub const GENERATION_TEMPERATURE: f64 = 0.7;

/// Default timeout around one text-generation call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// The four generation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Ideas,
    Milestones,
    Help,
    Blurb,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Ideas => "ideas",
            Operation::Milestones => "milestones",
            Operation::Help => "help",
            Operation::Blurb => "blurb",
        }
    }
}

/// Cache key builders.
pub mod keys {
    pub fn ideas(skills: &[String], goal: &str, weeks: u32) -> String {
        format!("ideas_{}_{}_{}", skills.join(","), goal, weeks)
    }

    pub fn milestones(project_title: &str) -> String {
        format!("milestones_{}", project_title)
    }

    pub fn help(project_title: &str, milestone_title: &str) -> String {
        format!("help_{}_{}", project_title, milestone_title)
    }

    pub fn blurb(project_title: &str) -> String {
        format!("blurb_{}", project_title)
    }
}

/// Produces structured content from prompts, consulting the cache first.
pub struct ContentGenerator {
    provider: Arc<dyn LlmProvider>,
    cache: ResponseCache,
    model: String,
    timeout: Duration,
}

impl ContentGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, cache: ResponseCache, model: impl Into<String>) -> Self {
        Self {
            provider,
            cache,
            model: model.into(),
            timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Suggest project ideas. Falls back to a single static idea on failure.
    pub async fn generate_ideas(
        &self,
        skills: &[String],
        goal: &str,
        weeks: u32,
    ) -> Generated<Vec<ProjectIdea>> {
        let key = keys::ideas(skills, goal, weeks);
        let prompt = prompts::build_ideas_prompt(skills, goal, weeks);
        self.generate(Operation::Ideas, &key, &prompt, || vec![ProjectIdea::fallback()])
            .await
    }

    /// Break a project into milestones. Empty on failure.
    pub async fn break_milestones(&self, project_title: &str) -> Generated<Vec<MilestoneDraft>> {
        let key = keys::milestones(project_title);
        let prompt = prompts::build_milestones_prompt(project_title);
        self.generate(Operation::Milestones, &key, &prompt, Vec::new)
            .await
    }

    /// Implementation checklist for one milestone. Empty on failure.
    pub async fn milestone_help(
        &self,
        milestone_title: &str,
        project_title: &str,
    ) -> Generated<MilestoneHelp> {
        let key = keys::help(project_title, milestone_title);
        let prompt = prompts::build_help_prompt(milestone_title, project_title);
        self.generate(Operation::Help, &key, &prompt, MilestoneHelp::default)
            .await
    }

    /// Portfolio blurb. Empty on failure.
    pub async fn portfolio_blurb(&self, project_title: &str) -> Generated<PortfolioBlurb> {
        let key = keys::blurb(project_title);
        let prompt = prompts::build_blurb_prompt(project_title);
        self.generate(Operation::Blurb, &key, &prompt, PortfolioBlurb::default)
            .await
    }

    async fn generate<T, F>(
        &self,
        operation: Operation,
        key: &str,
        prompt: &str,
        on_failure: F,
    ) -> Generated<T>
    where
        T: ContentSchema + Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.run(operation, key, prompt).await {
            Ok(result) => {
                let status = if result.cached { "cached" } else { "ok" };
                metrics::record_generation(operation.as_str(), status);
                result
            }
            Err(e) => {
                tracing::warn!(
                    operation = operation.as_str(),
                    key = %key,
                    error = %e,
                    "AI generation failed, returning fallback"
                );
                metrics::record_generation(operation.as_str(), "fallback");
                Generated::failed(
                    on_failure(),
                    format!("Failed to generate {}: {}", operation.as_str(), e),
                )
            }
        }
    }

    async fn run<T>(
        &self,
        operation: Operation,
        key: &str,
        prompt: &str,
    ) -> Result<Generated<T>, GenerationError>
    where
        T: ContentSchema + Serialize + DeserializeOwned,
    {
        if let Some(payload) = self.cache.get(key).await {
            match serde_json::from_value::<T>(payload) {
                Ok(data) if data.validate().is_ok() => return Ok(Generated::cached(data)),
                _ => tracing::warn!(key = %key, "Cached payload no longer fits its schema, regenerating"),
            }
        }

        let started = Instant::now();
        let completion = tokio::time::timeout(
            self.timeout,
            self.provider
                .complete(&self.model, prompt, GENERATION_TEMPERATURE),
        )
        .await;
        metrics::record_generation_latency(operation.as_str(), started.elapsed().as_secs_f64());

        let text = match completion {
            Ok(result) => result?,
            Err(_) => {
                return Err(LlmError::Timeout {
                    seconds: self.timeout.as_secs(),
                }
                .into())
            }
        };

        let data: T = parse_structured(&text)
            .map_err(|e| GenerationError::GenerationParseError(e.to_string()))?;
        data.validate()
            .map_err(GenerationError::GenerationParseError)?;

        match serde_json::to_value(&data) {
            Ok(payload) => {
                if let Err(e) = self.cache.put(key, prompt, &payload, None).await {
                    tracing::warn!(key = %key, error = %e, "Failed to cache AI response");
                }
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to encode AI response for caching"),
        }

        Ok(Generated::fresh(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Choice, GenerationRequest, GenerationResponse, Message, Usage};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedProvider {
        reply: Result<String, ()>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(request.temperature, Some(GENERATION_TEMPERATURE));
            let text = self
                .reply
                .clone()
                .map_err(|_| LlmError::RequestFailed("connection refused".to_string()))?;
            Ok(GenerationResponse {
                id: "scripted".to_string(),
                model: request.model,
                choices: vec![Choice {
                    index: 0,
                    message: Message::assistant(text),
                    finish_reason: "stop".to_string(),
                }],
                usage: Usage {
                    prompt_tokens: 0,
                    completion_tokens: 0,
                    total_tokens: 0,
                },
            })
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl LlmProvider for SlowProvider {
        async fn generate(&self, _: GenerationRequest) -> Result<GenerationResponse, LlmError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Err(LlmError::EmptyResponse)
        }
    }

    fn generator(provider: Arc<dyn LlmProvider>) -> ContentGenerator {
        let cache = ResponseCache::new(Arc::new(MemoryStore::new()));
        ContentGenerator::new(provider, cache, "test-model")
    }

    #[test]
    fn test_cache_keys() {
        let skills = vec!["React".to_string(), "SQL".to_string()];
        assert_eq!(keys::ideas(&skills, "internship", 4), "ideas_React,SQL_internship_4");
        assert_eq!(keys::milestones("Todo"), "milestones_Todo");
        assert_eq!(keys::help("Todo", "Setup"), "help_Todo_Setup");
        assert_eq!(keys::blurb("Todo"), "blurb_Todo");
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let provider = Arc::new(ScriptedProvider::replying(
            "```json\n{\"blurb\": \"A dashboard for tasks\"}\n```",
        ));
        let generator = generator(provider.clone());

        let first = generator.portfolio_blurb("Todo").await;
        assert!(first.is_ok());
        assert!(!first.cached);
        assert_eq!(first.data.blurb, "A dashboard for tasks");

        let second = generator.portfolio_blurb("Todo").await;
        assert!(second.cached);
        assert_eq!(second.data, first.data);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ideas_fall_back_on_upstream_failure() {
        let generator = generator(Arc::new(ScriptedProvider::failing()));

        let result = generator
            .generate_ideas(&["Python".to_string()], "job", 4)
            .await;

        assert!(!result.cached);
        assert_eq!(result.data, vec![ProjectIdea::fallback()]);
        assert!(result.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_unparseable_completion_returns_empty_default() {
        let provider = Arc::new(ScriptedProvider::replying("Sorry, I can't do that."));
        let generator = generator(provider);

        let result = generator.break_milestones("Todo").await;
        assert!(result.data.is_empty());
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let provider = Arc::new(ScriptedProvider::replying("{\"steps\": []}"));
        let generator = generator(provider.clone());

        let first = generator.milestone_help("Setup", "Todo").await;
        assert_eq!(first.data, MilestoneHelp::default());
        assert!(first.error.is_some());

        let _ = generator.milestone_help("Setup", "Todo").await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_becomes_upstream_failure() {
        let generator =
            generator(Arc::new(SlowProvider)).with_timeout(Duration::from_millis(20));

        let result = generator.portfolio_blurb("Todo").await;
        assert_eq!(result.data, PortfolioBlurb::default());
        assert!(result.error.unwrap().contains("timed out"));
    }
}
