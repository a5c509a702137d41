//! registry.rs
//! Process-wide plugin registries and factory functions.
//!
//! Design notes:
//! - Registries map a string id to a zero-argument factory; lookups that miss
//!   are caller errors (`JitError::UnknownPlugin`).
//! - Registration is additive and explicit (`crate::register_all`); nothing is
//!   populated by static initializers.
//! - Factories are cloned out of the lock before they run so a factory may
//!   itself build from another registry.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::compressors::PoorJitCompressor;
use crate::constants::{DEFAULT_GENERATOR_ID, POORJIT_ID};
use crate::generators::{Generator, TemplateGenerator};
use crate::plugin::CompressorPlugin;
use crate::types::{JitError, JitResult};

pub type Factory<T> = Arc<dyn Fn() -> JitResult<T> + Send + Sync>;

pub struct Registry<T> {
    kind: &'static str,
    factories: RwLock<BTreeMap<String, Factory<T>>>,
}

impl<T> Registry<T> {
    pub const fn new(kind: &'static str) -> Self {
        Self { kind, factories: RwLock::new(BTreeMap::new()) }
    }

    /// Register (or replace) the factory for `id`.
    pub fn register<F>(&self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> JitResult<T> + Send + Sync + 'static,
    {
        let id = id.into();
        tracing::debug!(kind = self.kind, id = %id, "registering plugin factory");
        let mut guard = self.factories.write().unwrap_or_else(|e| e.into_inner());
        guard.insert(id, Arc::new(factory));
    }

    /// Construct a fresh instance for `id`.
    pub fn build(&self, id: &str) -> JitResult<T> {
        let factory = {
            let guard = self.factories.read().unwrap_or_else(|e| e.into_inner());
            guard.get(id).cloned()
        };
        match factory {
            Some(f) => f(),
            None => Err(JitError::UnknownPlugin { kind: self.kind, id: id.to_string() }),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        let guard = self.factories.read().unwrap_or_else(|e| e.into_inner());
        guard.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let guard = self.factories.read().unwrap_or_else(|e| e.into_inner());
        guard.keys().cloned().collect()
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

static GENERATORS: Registry<Box<dyn Generator>> = Registry::new("generator");
static COMPRESSORS: Registry<Box<dyn CompressorPlugin>> = Registry::new("compressor");

/// Registry of source generators.
pub fn generator_plugins() -> &'static Registry<Box<dyn Generator>> {
    &GENERATORS
}

/// Registry of compressor implementations.
pub fn compressor_plugins() -> &'static Registry<Box<dyn CompressorPlugin>> {
    &COMPRESSORS
}

/// Register every built-in plugin. Safe to call more than once.
pub fn register_builtin_plugins() {
    generator_plugins().register(DEFAULT_GENERATOR_ID, || {
        Ok(Box::new(TemplateGenerator::new()) as Box<dyn Generator>)
    });
    compressor_plugins().register(POORJIT_ID, || {
        Ok(Box::new(PoorJitCompressor::new()?) as Box<dyn CompressorPlugin>)
    });
}
