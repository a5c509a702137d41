//! generators/mod.rs
//! Source generators: produce compilable source text from configuration.
//!
//! Design notes:
//! - `generate` is a pure function of current configuration; no hidden state.
//! - Instances are built by `registry::generator_plugins()` and owned by the requester.
//! - `clone_box` is a deep copy; clones share no mutable state.

pub mod template;

pub use template::*;

use crate::plugin::{Configurable, Versionable};
use crate::types::JitResult;

pub trait Generator: Configurable + Versionable + Send {
    /// Produce source text; an empty string means "nothing to compile".
    fn generate(&self) -> JitResult<String>;

    fn clone_box(&self) -> Box<dyn Generator>;

    fn plugin_type(&self) -> &'static str {
        "generator"
    }
}
