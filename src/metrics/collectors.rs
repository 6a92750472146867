//! Recording helpers for launchpad operations.
//!
//! Each helper is a no-op until [`super::init_metrics`] has run, so library
//! code can record unconditionally.

use super::prometheus::{
    AI_CACHE_LOOKUPS, AI_GENERATIONS_TOTAL, AI_GENERATION_LATENCY, MILESTONE_TOGGLES,
    PORTFOLIOS_PUBLISHED, REVIEWS_SUBMITTED,
};

/// Record one cache lookup (`"hit"`, `"miss"` or `"error"`).
pub fn record_cache_lookup(result: &str) {
    if let Some(lookups) = AI_CACHE_LOOKUPS.get() {
        lookups.with_label_values(&[result]).inc();
    }
}

/// Record the outcome of one generation operation.
///
/// # Arguments
///
/// * `operation` - `"ideas"`, `"milestones"`, `"help"` or `"blurb"`
/// * `status` - `"cached"`, `"ok"` or `"fallback"`
pub fn record_generation(operation: &str, status: &str) {
    if let Some(total) = AI_GENERATIONS_TOTAL.get() {
        total.with_label_values(&[operation, status]).inc();
    }

    tracing::trace!(operation = operation, status = status, "Recorded generation metric");
}

/// Record how long the text-generation service took for one call.
pub fn record_generation_latency(operation: &str, latency_secs: f64) {
    if let Some(latency) = AI_GENERATION_LATENCY.get() {
        latency.with_label_values(&[operation]).observe(latency_secs);
    }
}

/// Record a mentor submission.
pub fn record_review_submitted(verified: bool) {
    if let Some(reviews) = REVIEWS_SUBMITTED.get() {
        let verdict = if verified { "verified" } else { "rejected" };
        reviews.with_label_values(&[verdict]).inc();
    }
}

pub fn record_portfolio_published() {
    if let Some(published) = PORTFOLIOS_PUBLISHED.get() {
        published.inc();
    }
}

pub fn record_milestone_toggle() {
    if let Some(toggles) = MILESTONE_TOGGLES.get() {
        toggles.inc();
    }
}
