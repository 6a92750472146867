//! Public slug generation.

use chrono::{DateTime, Utc};

/// Turn free text into a URL-safe slug.
///
/// Lowercases, drops everything except ASCII alphanumerics, whitespace and
/// `-`, turns whitespace runs into a single `-`, collapses repeated `-` and
/// trims `-` from both ends. Dropped characters leave no separator behind.
pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_ascii_alphanumeric() {
            slug.push(c);
        }
    }
    slug.trim_matches('-').to_string()
}

/// Lowercase base-36 rendering of `value`.
pub fn base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Slug for a new project: the title's slug plus a base-36 millisecond stamp.
pub fn project_slug(title: &str, at: DateTime<Utc>) -> String {
    let millis = u64::try_from(at.timestamp_millis()).unwrap_or_default();
    let base = generate_slug(title);
    if base.is_empty() {
        base36(millis)
    } else {
        format!("{}-{}", base, base36(millis))
    }
}
