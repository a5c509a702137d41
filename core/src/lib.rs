//! jit-core
//!
//! Compressors whose source is generated at runtime, compiled on demand and
//! loaded into the running process.
//!
//! Flow: options → generator (source) → flag resolver (build flags) →
//! JIT manager (compiled implementation) → `PoorJitCompressor` (delegation).

#![deny(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Containers
pub mod options;
pub mod data;

// Plugin surface
pub mod plugin;
pub mod registry;
pub mod generators;
pub mod flags;
pub mod jit;
pub mod compressors;

/// Register every built-in generator and compressor.
///
/// Call once at startup before building plugins by id; repeated calls are harmless.
pub fn register_all() {
    registry::register_builtin_plugins();
}

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compressors::PoorJitCompressor;
    pub use crate::data::{DType, PressioData};
    pub use crate::flags::{FlagResolver, PkgConfigResolver};
    pub use crate::generators::{Generator, TemplateGenerator};
    pub use crate::jit::{JitConfig, JitManager, RustcJitManager};
    pub use crate::options::{OptionValue, Options};
    pub use crate::plugin::{CompressorPlugin, Configurable, Versionable};
    pub use crate::registry::{compressor_plugins, generator_plugins};
    pub use crate::types::{JitError, JitResult};
    pub use crate::register_all;
}
