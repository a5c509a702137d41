use std::io;

use thiserror::Error;

use crate::data::DataError;

/// Unified error covering configuration, toolchain, loading and delegation.
/// - Ergonomic `From<T>` impls enable `?` across the update pipeline.
/// - `code()` maps every variant onto the non-zero result code hosts expect
///   next to the message.
#[derive(Debug, Error)]
pub enum JitError {
    /// Malformed configuration, rejected before any external call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Registry lookup missed.
    #[error("unknown {kind} plugin: {id}")]
    UnknownPlugin { kind: &'static str, id: String },

    /// The build-flag tool could not be located or invoked.
    #[error("failed to run {tool}: {msg}")]
    Resolution { tool: String, msg: String },

    /// The toolchain rejected the generated source or flags.
    /// Carries the diagnostic verbatim.
    #[error("{0}")]
    Compile(String),

    /// Compression requested before any successful compile.
    #[error("failed to compile the compressor")]
    NotCompiled,

    /// The artifact compiled but could not be loaded or is ABI-incompatible.
    #[error("failed to load compiled plugin: {0}")]
    Load(String),

    /// Error code and message reported by the compiled implementation.
    #[error("{msg}")]
    Plugin { code: i32, msg: String },

    /// Data frame encode/decode failure.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// I/O error while staging sources or artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl JitError {
    /// Non-zero result code paired with the message at the host boundary.
    pub fn code(&self) -> i32 {
        match self {
            JitError::Validation(_) => 1,
            JitError::UnknownPlugin { .. } => 2,
            JitError::Resolution { .. } => 3,
            JitError::Compile(_) => 4,
            JitError::NotCompiled => 5,
            JitError::Load(_) => 6,
            JitError::Plugin { code, .. } => {
                if *code == 0 { 1 } else { *code }
            }
            JitError::Data(_) => 7,
            JitError::Io(_) => 8,
        }
    }
}

pub type JitResult<T> = Result<T, JitError>;
