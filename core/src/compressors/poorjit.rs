//! compressors/poorjit.rs
//! Orchestrating compressor: generate → resolve flags → compile → delegate.
//!
//! Design notes:
//! - `set_options` is the only state transition. It (1) rebuilds/configures the
//!   generator, (2) takes extra flags and package ids, (3) resolves build flags,
//!   (4) generates source, (5) compiles non-empty source, (6) forwards the full
//!   options to the compiled implementation.
//! - A failed compile leaves the previous implementation (or its absence) in place.
//! - Compression calls are pass-throughs; with nothing compiled they fail with
//!   `JitError::NotCompiled` and never touch the output buffer.
//! - The last error is kept for hosts that read a code + message pair.

use std::sync::Arc;

use crate::constants::{
    poorjit_keys, predictor_keys, pressio_keys, DEFAULT_GENERATOR_ID, POORJIT_ID,
    STABILITY_EXPERIMENTAL,
};
use crate::data::PressioData;
use crate::flags::{build_flags, FlagResolver, PkgConfigResolver};
use crate::generators::Generator;
use crate::jit::{JitManager, RustcJitManager};
use crate::options::{accumulate_configuration, Options, ThreadSafety};
use crate::plugin::{CompressorPlugin, Configurable, Versionable};
use crate::registry::generator_plugins;
use crate::types::{JitError, JitResult};

/// Keys owned by the orchestrator whose change invalidates predictor caches.
const INVALIDATIONS: [&str; 2] = [poorjit_keys::EXTRA_ARGS, poorjit_keys::PKGCONFIG];

pub struct PoorJitCompressor {
    name: String,
    generator_id: String,
    generator: Box<dyn Generator>,
    extra_flags: Vec<String>,
    package_ids: Vec<String>,
    compiled: Option<Box<dyn CompressorPlugin>>,
    jit: Arc<dyn JitManager>,
    resolver: Arc<dyn FlagResolver>,
    last_error: Option<(i32, String)>,
}

impl PoorJitCompressor {
    /// Orchestrator with the rustc JIT manager and the `pkg-config` resolver.
    pub fn new() -> JitResult<Self> {
        Self::with_collaborators(
            Arc::new(RustcJitManager::from_env()),
            Arc::new(PkgConfigResolver::new()),
        )
    }

    /// Orchestrator with caller-supplied JIT manager and flag resolver.
    pub fn with_collaborators(
        jit: Arc<dyn JitManager>,
        resolver: Arc<dyn FlagResolver>,
    ) -> JitResult<Self> {
        let generator = generator_plugins().build(DEFAULT_GENERATOR_ID)?;
        Ok(Self {
            name: String::new(),
            generator_id: DEFAULT_GENERATOR_ID.to_string(),
            generator,
            extra_flags: Vec::new(),
            package_ids: Vec::new(),
            compiled: None,
            jit,
            resolver,
            last_error: None,
        })
    }

    pub fn generator_id(&self) -> &str {
        &self.generator_id
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    pub fn extra_flags(&self) -> &[String] {
        &self.extra_flags
    }

    pub fn package_ids(&self) -> &[String] {
        &self.package_ids
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn compiled(&self) -> Option<&dyn CompressorPlugin> {
        self.compiled.as_deref()
    }

    /// Code of the last failed operation, 0 if the last operation succeeded.
    pub fn error_code(&self) -> i32 {
        self.last_error.as_ref().map(|(c, _)| *c).unwrap_or(0)
    }

    /// Message of the last failed operation, empty if it succeeded.
    pub fn error_msg(&self) -> &str {
        self.last_error.as_ref().map(|(_, m)| m.as_str()).unwrap_or("")
    }

    fn record<T>(&mut self, result: JitResult<T>) -> JitResult<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => self.last_error = Some((e.code(), e.to_string())),
        }
        result
    }

    fn child_name(&self, suffix: &str) -> String {
        format!("{}/{}", self.name, suffix)
    }

    /// Step 1: candidate generator, rebuilt when the id changes, then configured.
    fn next_generator(&self, options: &Options) -> JitResult<(String, Box<dyn Generator>)> {
        let requested = options
            .get_str(poorjit_keys::GENERATOR)
            .require(poorjit_keys::GENERATOR, "string")?;

        let (id, mut generator) = match requested {
            Some(id) if id != self.generator_id => {
                tracing::debug!(from = %self.generator_id, to = %id, "switching generator");
                let mut g = generator_plugins().build(id)?;
                if !self.name.is_empty() {
                    g.set_name(&self.child_name("generator"));
                }
                (id.to_string(), g)
            }
            _ => (self.generator_id.clone(), self.generator.clone_box()),
        };
        generator.set_options(options)?;
        Ok((id, generator))
    }

    fn update(&mut self, options: &Options) -> JitResult<()> {
        // Validation: nothing is committed until every key has the right type.
        let (generator_id, generator) = self.next_generator(options)?;
        let extra_flags = options
            .get_strings(poorjit_keys::EXTRA_ARGS)
            .require(poorjit_keys::EXTRA_ARGS, "strings")?
            .map(<[String]>::to_vec);
        let package_ids = options
            .get_strings(poorjit_keys::PKGCONFIG)
            .require(poorjit_keys::PKGCONFIG, "strings")?
            .map(<[String]>::to_vec);

        self.generator_id = generator_id;
        self.generator = generator;
        if let Some(extra_flags) = extra_flags {
            self.extra_flags = extra_flags;
        }
        if let Some(package_ids) = package_ids {
            self.package_ids = package_ids;
        }

        let flags = build_flags(&self.extra_flags, &self.package_ids, self.resolver.as_ref())?;
        let source = self.generator.generate()?;

        if !source.is_empty() {
            let mut fresh = self.jit.jit(&source, &flags)?;
            if !self.name.is_empty() {
                fresh.set_name(&self.child_name("compressor"));
            }
            tracing::info!(prefix = %fresh.prefix(), "replaced compiled compressor");
            self.compiled = Some(fresh);
        } else {
            tracing::debug!("generator produced no source; keeping current implementation");
        }

        match self.compiled.as_mut() {
            Some(compiled) => compiled.set_options(options),
            None => Ok(()),
        }
    }

    fn delegate<F>(&mut self, f: F) -> JitResult<()>
    where
        F: FnOnce(&mut dyn CompressorPlugin) -> JitResult<()>,
    {
        let result = match self.compiled.as_deref_mut() {
            Some(compiled) => f(compiled),
            None => Err(JitError::NotCompiled),
        };
        self.record(result)
    }
}

impl Versionable for PoorJitCompressor {
    fn patch_version(&self) -> u32 {
        1
    }
}

impl Configurable for PoorJitCompressor {
    fn prefix(&self) -> &str {
        POORJIT_ID
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        let generator_name = self.child_name("generator");
        self.generator.set_name(&generator_name);
        if self.compiled.is_some() {
            let compressor_name = self.child_name("compressor");
            if let Some(compiled) = self.compiled.as_mut() {
                compiled.set_name(&compressor_name);
            }
        }
    }

    fn children(&self) -> Vec<String> {
        let mut v = vec![self.generator.name().to_string()];
        if let Some(compiled) = &self.compiled {
            v.push(compiled.name().to_string());
        }
        v
    }

    fn set_options(&mut self, options: &Options) -> JitResult<()> {
        let result = self.update(options);
        if let Err(e) = &result {
            tracing::warn!(error = %e, code = e.code(), "poorjit configuration update failed");
        }
        self.record(result)
    }

    fn get_options(&self) -> Options {
        let mut options = Options::new()
            .with(poorjit_keys::GENERATOR, self.generator_id.clone())
            .with(poorjit_keys::EXTRA_ARGS, self.extra_flags.clone())
            .with(poorjit_keys::PKGCONFIG, self.package_ids.clone());
        options.copy_from(&self.generator.get_options());
        if let Some(compiled) = &self.compiled {
            options.copy_from(&compiled.get_options());
        }
        options
    }

    fn get_documentation(&self) -> Options {
        let mut options = Options::new()
            .with(pressio_keys::DESCRIPTION, "use a poorman's JIT library to run a compressor")
            .with(poorjit_keys::GENERATOR, "the generator used to produce compressor source")
            .with(poorjit_keys::EXTRA_ARGS, "extra flags passed to the compiler")
            .with(poorjit_keys::PKGCONFIG, "packages whose build flags are queried with pkg-config");
        let mut nested = self.generator.get_documentation();
        nested.remove(pressio_keys::DESCRIPTION);
        options.copy_from(&nested);
        if let Some(compiled) = &self.compiled {
            let mut nested = compiled.get_documentation();
            nested.remove(pressio_keys::DESCRIPTION);
            options.copy_from(&nested);
        }
        options
    }

    fn get_configuration(&self) -> Options {
        let mut options = Options::new();
        let generator_config = self.generator.get_configuration();
        let compiled_config = self.compiled.as_ref().map(|c| c.get_configuration());
        let mut children: Vec<&Options> = vec![&generator_config];
        if let Some(cfg) = &compiled_config {
            options.copy_from(cfg);
            children.push(cfg);
        }

        // Own metadata overrides whatever the compiled implementation reports.
        options.set(pressio_keys::THREAD_SAFE, ThreadSafety::Multiple);
        options.set(pressio_keys::STABILITY, STABILITY_EXPERIMENTAL);
        for key in predictor_keys::ALL {
            options.set(key, accumulate_configuration(key, &children, &INVALIDATIONS));
        }
        options
    }
}

impl CompressorPlugin for PoorJitCompressor {
    fn compress(&mut self, input: &PressioData, output: &mut PressioData) -> JitResult<()> {
        self.delegate(|c| c.compress(input, output))
    }

    fn decompress(&mut self, input: &PressioData, output: &mut PressioData) -> JitResult<()> {
        self.delegate(|c| c.decompress(input, output))
    }

    fn compress_many(&mut self, inputs: &[&PressioData], outputs: &mut [PressioData]) -> JitResult<()> {
        self.delegate(|c| c.compress_many(inputs, outputs))
    }

    fn decompress_many(&mut self, inputs: &[&PressioData], outputs: &mut [PressioData]) -> JitResult<()> {
        self.delegate(|c| c.decompress_many(inputs, outputs))
    }

    fn get_metrics_results(&self) -> Options {
        match &self.compiled {
            Some(compiled) => compiled.get_metrics_results(),
            None => Options::new(),
        }
    }

    /// Deep-copies the generator; the compiled implementation is duplicated
    /// through its own `clone_box` (same loaded code, independent instance).
    fn clone_box(&self) -> JitResult<Box<dyn CompressorPlugin>> {
        let compiled = match &self.compiled {
            Some(c) => Some(c.clone_box()?),
            None => None,
        };
        Ok(Box::new(Self {
            name: self.name.clone(),
            generator_id: self.generator_id.clone(),
            generator: self.generator.clone_box(),
            extra_flags: self.extra_flags.clone(),
            package_ids: self.package_ids.clone(),
            compiled,
            jit: Arc::clone(&self.jit),
            resolver: Arc::clone(&self.resolver),
            last_error: self.last_error.clone(),
        }))
    }
}
