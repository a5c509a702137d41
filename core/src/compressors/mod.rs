//! compressors/mod.rs
//! Compressor implementations registered with `registry::compressor_plugins()`.

pub mod poorjit;

pub use poorjit::*;
