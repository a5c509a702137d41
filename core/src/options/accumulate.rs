//! options/accumulate.rs
//! Predictor-group accumulation across a configurable and its children.
//!
//! A caching layer keys predictions by the option names listed under each
//! `predictors:*` group. A parent that owns children reports the union of its
//! children's groups plus its own keys whose change must invalidate the cache.

use crate::options::types::{OptionValue, Options};

/// Union of `key` (a `Strings` value) across `children` configurations, then
/// `invalidations`, keeping first occurrence order and dropping duplicates.
pub fn accumulate_configuration(
    key: &str,
    children: &[&Options],
    invalidations: &[&str],
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |s: &str| {
        if !out.iter().any(|have| have == s) {
            out.push(s.to_string());
        }
    };

    for child in children {
        if let Some(OptionValue::Strings(values)) = child.get(key) {
            for v in values {
                push(v);
            }
        }
    }
    for inv in invalidations {
        push(inv);
    }
    out
}
