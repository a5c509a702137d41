//! constants.rs
//! Stable option keys, defaults and wire identifiers.
//!
//! Keys are part of the external configuration namespace; renaming one is a
//! breaking change for every host that configures the orchestrator.

/// Magic number for the data frame passed across the plugin ABI.
/// "PJD1" = Pressio JIT Data v1
pub const MAGIC_PJD1: [u8; 4] = *b"PJD1";

/// Identifier the orchestrator builds its generator from when nothing else
/// has been configured.
pub const DEFAULT_GENERATOR_ID: &str = "template";

/// Registry id of the orchestrating compressor.
pub const POORJIT_ID: &str = "poorjit";

/// Orchestrator keys.
pub mod poorjit_keys {
    pub const GENERATOR: &str = "poorjit:generator";
    pub const EXTRA_ARGS: &str = "poorjit:extra_args";
    pub const PKGCONFIG: &str = "poorjit:pkgconfig";
}

/// Template generator keys.
pub mod template_keys {
    pub const SOURCE: &str = "template:source";
    pub const KEYS: &str = "template:keys";
    pub const VALUES: &str = "template:values";
}

/// Shared metadata keys understood by every configurable.
pub mod pressio_keys {
    pub const DESCRIPTION: &str = "pressio:description";
    pub const THREAD_SAFE: &str = "pressio:thread_safe";
    pub const STABILITY: &str = "pressio:stability";
    pub const HIGHLEVEL: &str = "pressio:highlevel";
}

/// Configuration groups used by caching layers to key predictions.
pub mod predictor_keys {
    pub const ERROR_DEPENDENT: &str = "predictors:error_dependent";
    pub const ERROR_AGNOSTIC: &str = "predictors:error_agnostic";
    pub const RUNTIME: &str = "predictors:runtime";

    pub const ALL: [&str; 3] = [ERROR_DEPENDENT, ERROR_AGNOSTIC, RUNTIME];
}

/// Stability classes reported under `pressio:stability`.
pub const STABILITY_EXPERIMENTAL: &str = "experimental";

/// Environment overrides read by `JitConfig::from_env`.
pub mod env_vars {
    pub const RUSTC: &str = "PRESSIO_JIT_RUSTC";
    pub const CACHE_DIR: &str = "PRESSIO_JIT_CACHE_DIR";
    pub const EXTRA_RUSTFLAGS: &str = "PRESSIO_JIT_EXTRA_RUSTFLAGS";
}

/// Default external tools.
pub const DEFAULT_PKG_CONFIG: &str = "pkg-config";
pub const DEFAULT_RUSTC: &str = "rustc";
pub const DEFAULT_EDITION: &str = "2021";
