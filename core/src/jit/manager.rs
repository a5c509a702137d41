//! jit/manager.rs
//! Compile generated source and load it as a compressor.
//!
//! Design notes:
//! - `JitManager` is the seam the orchestrator depends on; tests substitute
//!   in-process managers.
//! - `RustcJitManager` builds a `cdylib` with `rustc`, then loads it through
//!   `LoadedCompressor`. A failed compile returns the compiler's stderr verbatim.
//! - Artifact names are content hashes of source + flags, so a cache directory
//!   can serve repeated requests without recompiling.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::jit::config::JitConfig;
use crate::jit::loaded::{LoadedCompressor, LoadedLibrary};
use crate::plugin::CompressorPlugin;
use crate::types::{JitError, JitResult};
use crate::utils::{artifact_id, crate_name_for, dylib_file_name};

pub trait JitManager: Send + Sync {
    /// Compile `source` with `flags` and return a fresh implementation.
    fn jit(&self, source: &str, flags: &[String]) -> JitResult<Box<dyn CompressorPlugin>>;
}

#[derive(Clone, Debug, Default)]
pub struct RustcJitManager {
    config: JitConfig,
}

impl RustcJitManager {
    pub fn new(config: JitConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(JitConfig::from_env())
    }

    pub fn config(&self) -> &JitConfig {
        &self.config
    }

    fn compiler(&self) -> JitResult<PathBuf> {
        which::which(&self.config.rustc).map_err(|e| {
            JitError::Compile(format!("compiler {} not found: {}", self.config.rustc, e))
        })
    }

    /// Full flag list handed to rustc for a request.
    pub fn rustc_flags(&self, flags: &[String]) -> Vec<String> {
        let mut out = if self.config.translate_c_flags {
            translate_flags(flags)
        } else {
            flags.to_vec()
        };
        out.extend(self.config.extra_rustflags.iter().cloned());
        out
    }

    fn build(&self, rustc: &Path, source: &str, crate_name: &str, dir: &Path, artifact: &Path, flags: &[String]) -> JitResult<()> {
        let src_path = dir.join(format!("{}.rs", crate_name));
        fs::write(&src_path, source)?;

        // Compile next to the final name, then rename, so a cache hit never
        // observes a half-written artifact.
        let staging = dir.join(format!("{}.{}.partial", dylib_file_name(crate_name), std::process::id()));

        let started = Instant::now();
        tracing::info!(crate_name = %crate_name, flags = ?flags, "compiling generated source");
        let output = Command::new(rustc)
            .arg("--crate-type")
            .arg("cdylib")
            .arg("--edition")
            .arg(&self.config.edition)
            .arg("--crate-name")
            .arg(crate_name)
            .arg("-o")
            .arg(&staging)
            .arg(&src_path)
            .args(flags)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| JitError::Compile(format!("failed to run {}: {}", rustc.display(), e)))?;

        if !output.status.success() {
            let diagnostic = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::warn!(
                crate_name = %crate_name,
                status = ?output.status.code(),
                "generated source failed to compile"
            );
            let _ = fs::remove_file(&staging);
            return Err(JitError::Compile(diagnostic));
        }

        fs::rename(&staging, artifact)?;
        tracing::info!(
            crate_name = %crate_name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "compiled generated source"
        );
        Ok(())
    }
}

impl JitManager for RustcJitManager {
    fn jit(&self, source: &str, flags: &[String]) -> JitResult<Box<dyn CompressorPlugin>> {
        let rustc = self.compiler()?;
        let flags = self.rustc_flags(flags);
        let id = artifact_id(source, &flags);
        let crate_name = crate_name_for(&id);

        let (dir, workdir) = match &self.config.cache_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                (dir.clone(), None)
            }
            None => {
                let tmp = tempfile::Builder::new().prefix("pressio-jit-").tempdir()?;
                (tmp.path().to_path_buf(), Some(tmp))
            }
        };
        let artifact = dir.join(dylib_file_name(&crate_name));

        if workdir.is_none() && artifact.is_file() {
            tracing::debug!(artifact = %artifact.display(), "reusing cached artifact");
        } else {
            self.build(&rustc, source, &crate_name, &dir, &artifact, &flags)?;
        }

        let library = LoadedLibrary::open(&artifact, workdir)?;
        Ok(Box::new(LoadedCompressor::load(library)?))
    }
}

/// Rewrite C-toolchain flags (as printed by `pkg-config`) into rustc flags.
///
/// `-lfoo` → `-l foo`, `-L/dir` → `-L /dir`, `-Wl,x` → `-C link-arg=-Wl,x`;
/// preprocessor flags have no rustc meaning and are dropped.
pub fn translate_flags(flags: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(flags.len());
    for flag in flags {
        if flag == "-pthread"
            || flag.starts_with("-I")
            || flag.starts_with("-D")
            || flag.starts_with("-U")
        {
            tracing::debug!(flag = %flag, "dropping preprocessor flag");
            continue;
        }
        if let Some(lib) = flag.strip_prefix("-l").filter(|s| !s.is_empty()) {
            out.push("-l".to_string());
            out.push(lib.to_string());
        } else if let Some(dir) = flag.strip_prefix("-L").filter(|s| !s.is_empty()) {
            out.push("-L".to_string());
            out.push(dir.to_string());
        } else if flag.starts_with("-Wl,") {
            out.push("-C".to_string());
            out.push(format!("link-arg={}", flag));
        } else {
            out.push(flag.clone());
        }
    }
    out
}
