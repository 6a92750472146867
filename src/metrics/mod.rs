//! Metrics module for Prometheus-based monitoring.
//!
//! Counters and histograms for cache effectiveness, AI generation, reviews,
//! portfolio publication and milestone activity.
//!
//! # Example
//!
//! ```ignore
//! use launchpad::metrics::{init_metrics, export_metrics, record_cache_lookup};
//!
//! init_metrics()?;
//! record_cache_lookup("hit");
//! let metrics_text = export_metrics();
//! ```

pub mod collectors;
pub mod prometheus;

pub use collectors::{
    record_cache_lookup, record_generation, record_generation_latency,
    record_milestone_toggle, record_portfolio_published, record_review_submitted,
};
pub use prometheus::{export_metrics, init_metrics, REGISTRY};
