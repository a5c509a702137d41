//! jit/mod.rs
//! Compile-and-load of generated compressor source.
//!
//! Layers:
//! - `abi`    : the C ABI a compiled artifact exports.
//! - `config` : toolchain settings (`JitConfig`).
//! - `manager`: `JitManager` seam and the rustc-backed implementation.
//! - `loaded` : `LoadedCompressor`, the host-side handle to a loaded artifact.

pub mod abi;
pub mod config;
pub mod manager;
pub mod loaded;

pub use abi::{PluginOp, PLUGIN_ABI_SOURCE, PLUGIN_ABI_VERSION};
pub use config::JitConfig;
pub use manager::{translate_flags, JitManager, RustcJitManager};
pub use loaded::{LoadedCompressor, LoadedLibrary};
