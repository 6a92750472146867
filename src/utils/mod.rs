//! Shared utility functions for launchpad.
//!
//! Currently structured-data extraction from LLM completions.

pub mod json_extraction;

pub use json_extraction::{extract_fenced_block, parse_structured, JsonExtractionError};
