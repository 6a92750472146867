//! Prometheus metrics registration and export.
//!
//! Defines every Prometheus metric used by launchpad and the functions for
//! initializing and exporting them.

use prometheus::{
    Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all launchpad metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// AI cache lookups, labeled by result (hit, miss, error).
pub static AI_CACHE_LOOKUPS: OnceLock<CounterVec> = OnceLock::new();

/// AI generation calls, labeled by operation and status (ok, fallback).
pub static AI_GENERATIONS_TOTAL: OnceLock<CounterVec> = OnceLock::new();

/// Latency of calls to the text-generation service, labeled by operation.
pub static AI_GENERATION_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Submitted reviews, labeled by verdict (verified, rejected).
pub static REVIEWS_SUBMITTED: OnceLock<CounterVec> = OnceLock::new();

/// Portfolios published.
pub static PORTFOLIOS_PUBLISHED: OnceLock<Counter> = OnceLock::new();

/// Milestone completion toggles.
pub static MILESTONE_TOGGLES: OnceLock<Counter> = OnceLock::new();

/// Initialize all metrics and register them with the registry.
///
/// Call once at startup. Recording helpers are no-ops until this has run.
///
/// # Errors
///
/// Returns a `prometheus::Error` if metric registration fails, typically due to
/// duplicate metric names or invalid metric configurations.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    let registry = Registry::new();

    let cache_lookups = CounterVec::new(
        Opts::new("launchpad_ai_cache_lookups_total", "AI response cache lookups"),
        &["result"],
    )?;

    let generations_total = CounterVec::new(
        Opts::new("launchpad_ai_generations_total", "AI content generation calls"),
        &["operation", "status"],
    )?;

    let generation_latency = HistogramVec::new(
        HistogramOpts::new(
            "launchpad_ai_generation_latency_seconds",
            "Text-generation service latency in seconds",
        )
        .buckets(vec![0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0]),
        &["operation"],
    )?;

    let reviews_submitted = CounterVec::new(
        Opts::new("launchpad_reviews_submitted_total", "Mentor review submissions"),
        &["verdict"],
    )?;

    let portfolios_published = Counter::new(
        "launchpad_portfolios_published_total",
        "Portfolios published for verified projects",
    )?;

    let milestone_toggles = Counter::new(
        "launchpad_milestone_toggles_total",
        "Milestone completion toggles",
    )?;

    registry.register(Box::new(cache_lookups.clone()))?;
    registry.register(Box::new(generations_total.clone()))?;
    registry.register(Box::new(generation_latency.clone()))?;
    registry.register(Box::new(reviews_submitted.clone()))?;
    registry.register(Box::new(portfolios_published.clone()))?;
    registry.register(Box::new(milestone_toggles.clone()))?;

    // Already-set cells mean an earlier call won; keep those.
    let _ = REGISTRY.set(registry);
    let _ = AI_CACHE_LOOKUPS.set(cache_lookups);
    let _ = AI_GENERATIONS_TOTAL.set(generations_total);
    let _ = AI_GENERATION_LATENCY.set(generation_latency);
    let _ = REVIEWS_SUBMITTED.set(reviews_submitted);
    let _ = PORTFOLIOS_PUBLISHED.set(portfolios_published);
    let _ = MILESTONE_TOGGLES.set(milestone_toggles);

    tracing::info!("Prometheus metrics initialized successfully");

    Ok(())
}

/// Export all registered metrics in Prometheus text format.
///
/// Returns a comment line instead when the registry has not been initialized
/// or encoding fails.
pub fn export_metrics() -> String {
    let Some(registry) = REGISTRY.get() else {
        return "# Metrics not initialized. Call init_metrics() first.\n".to_string();
    };

    let encoder = TextEncoder::new();
    let metric_families = registry.gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return format!("# Error encoding metrics: {}\n", e);
    }

    String::from_utf8(buffer)
        .unwrap_or_else(|e| format!("# Error converting metrics to UTF-8: {}\n", e))
}
