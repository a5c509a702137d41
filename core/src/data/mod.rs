//! data/mod.rs
//! Typed buffers and the frame codec used at the compiled-plugin boundary.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
