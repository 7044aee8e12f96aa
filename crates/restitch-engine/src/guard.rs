//! Idempotency guard.
//!
//! Before splicing, the engine compares the located span against the fresh
//! rendering. Only a substantive difference earns a rewrite; trailing
//! whitespace per line is the one thing editors churn without meaning it,
//! so it is the one thing the comparison forgives. Leading whitespace,
//! blank-line structure, and entry order all count.

/// True when `existing` and `rendered` are the same fragment, ignoring
/// per-line trailing whitespace.
///
/// Line count must match; a missing or extra final newline does not count
/// as a line.
///
/// # Example
///
/// ```
/// use restitch_engine::canonical_eq;
///
/// assert!(canonical_eq("<li>a</li>  \n<li>b</li>", "<li>a</li>\n<li>b</li>"));
/// assert!(!canonical_eq("<li>a</li>\n<li>b</li>", "<li>b</li>\n<li>a</li>"));
/// ```
pub fn canonical_eq(existing: &str, rendered: &str) -> bool {
    let mut left = existing.lines().map(str::trim_end);
    let mut right = rendered.lines().map(str::trim_end);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a == b => {}
            _ => return false,
        }
    }
}

/// True when the located span must be rewritten.
pub fn needs_update(existing: &str, rendered: &str) -> bool {
    !canonical_eq(existing, rendered)
}
