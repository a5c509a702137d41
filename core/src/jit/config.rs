//! jit/config.rs
//! Toolchain settings for the rustc-backed JIT manager.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{env_vars, DEFAULT_EDITION, DEFAULT_RUSTC};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitConfig {
    /// Compiler executable, looked up on `PATH` unless it is a path.
    pub rustc: String,

    /// `--edition` passed to the compiler.
    pub edition: String,

    /// Where artifacts are kept and reused by content hash.
    /// - `None` → one temporary directory per compile, removed with the library.
    pub cache_dir: Option<PathBuf>,

    /// Flags appended to every compile, after the resolved build flags.
    pub extra_rustflags: Vec<String>,

    /// Rewrite C-style build flags (`-lfoo`, `-L/dir`, `-I…`) for rustc.
    pub translate_c_flags: bool,
}

impl Default for JitConfig {
    fn default() -> Self {
        Self {
            rustc: DEFAULT_RUSTC.to_string(),
            edition: DEFAULT_EDITION.to_string(),
            cache_dir: None,
            extra_rustflags: Vec::new(),
            translate_c_flags: true,
        }
    }
}

impl JitConfig {
    pub fn new(rustc: Option<String>, cache_dir: Option<PathBuf>) -> Self {
        Self {
            rustc: rustc.unwrap_or_else(|| DEFAULT_RUSTC.to_string()),
            cache_dir,
            ..Self::default()
        }
    }

    /// Defaults overridden by `PRESSIO_JIT_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(rustc) = std::env::var(env_vars::RUSTC) {
            if !rustc.trim().is_empty() {
                cfg.rustc = rustc;
            }
        }
        if let Ok(dir) = std::env::var(env_vars::CACHE_DIR) {
            if !dir.trim().is_empty() {
                cfg.cache_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(flags) = std::env::var(env_vars::EXTRA_RUSTFLAGS) {
            cfg.extra_rustflags = flags.split_whitespace().map(str::to_string).collect();
        }
        cfg
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }
}
