//! options/mod.rs
//! Key/value configuration container shared by every configurable.
//!
//! Design notes:
//! - Keys are namespaced strings (`prefix:name`); ordering is lexicographic so
//!   introspection output is deterministic.
//! - Typed lookups distinguish absent keys from type mismatches; callers turn
//!   the latter into validation errors.
//! - The container serializes to JSON for the compiled-plugin boundary.

pub mod types;
pub mod accumulate;

pub use types::*;
pub use accumulate::*;
