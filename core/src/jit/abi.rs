//! jit/abi.rs
//! C ABI between the host and a compiled compressor artifact.
//!
//! Design notes:
//! - The artifact exports one symbol, `pressio_jit_plugin_v1`, returning a
//!   pointer to a static `PluginVTable`.
//! - All traffic goes through `call(instance, op, input, len, sink, ctx)`:
//!   input bytes in, output bytes pushed to `sink`. The host owns every
//!   allocation it reads; nothing allocated by the artifact crosses over.
//! - Options travel as JSON (`Options` serde form), buffers as data frames.
//! - Compress/decompress input is two frames back to back: the input buffer,
//!   then the caller's output buffer with an empty payload (its dtype + dims).
//!   The reply is one frame, which replaces the caller's output.
//! - Return 0 on success. Non-zero is an error code and the sink carries the
//!   message; `OP_UNSUPPORTED` on an introspection op means "nothing to report".

use std::os::raw::c_void;

use num_enum::TryFromPrimitive;

/// Exported entry point name.
pub const PLUGIN_ENTRY_SYMBOL: &[u8] = b"pressio_jit_plugin_v1\0";

/// Layout version of `PluginVTable`.
pub const PLUGIN_ABI_VERSION: u32 = 1;

/// Returned by `call` for an op the artifact does not implement.
pub const OP_UNSUPPORTED: i32 = -1;

pub type SinkFn = unsafe extern "C" fn(ctx: *mut c_void, data: *const u8, len: usize);

pub type PluginEntry = unsafe extern "C" fn() -> *const PluginVTable;

#[repr(C)]
#[derive(Clone, Copy)]
pub struct PluginVTable {
    pub abi_version: u32,
    pub create: unsafe extern "C" fn() -> *mut c_void,
    pub clone: unsafe extern "C" fn(instance: *const c_void) -> *mut c_void,
    pub destroy: unsafe extern "C" fn(instance: *mut c_void),
    pub call: unsafe extern "C" fn(
        instance: *mut c_void,
        op: u32,
        input: *const u8,
        len: usize,
        sink: SinkFn,
        sink_ctx: *mut c_void,
    ) -> i32,
}

/// Operation codes understood by `PluginVTable::call`.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum PluginOp {
    Prefix           = 0,
    Version          = 1,
    SetOptions       = 2,
    GetOptions       = 3,
    GetDocumentation = 4,
    GetConfiguration = 5,
    GetMetrics       = 6,
    Compress         = 7,
    Decompress       = 8,
}

/// Rust declarations matching this ABI, for splicing into generated sources.
///
/// Provides `pressio_jit_abi::{PluginVTable, Sink, OP_*, emit, input}` and the
/// frame helpers `parse_frame`, `parse_request`, `write_frame`; the generated
/// code still defines its own `pressio_jit_plugin_v1` export.
pub const PLUGIN_ABI_SOURCE: &str = r#"
#[allow(dead_code)]
pub mod pressio_jit_abi {
    use std::os::raw::c_void;

    pub const ABI_VERSION: u32 = 1;
    pub const OP_PREFIX: u32 = 0;
    pub const OP_VERSION: u32 = 1;
    pub const OP_SET_OPTIONS: u32 = 2;
    pub const OP_GET_OPTIONS: u32 = 3;
    pub const OP_GET_DOCUMENTATION: u32 = 4;
    pub const OP_GET_CONFIGURATION: u32 = 5;
    pub const OP_GET_METRICS: u32 = 6;
    pub const OP_COMPRESS: u32 = 7;
    pub const OP_DECOMPRESS: u32 = 8;
    pub const OP_UNSUPPORTED: i32 = -1;

    pub type Sink = unsafe extern "C" fn(*mut c_void, *const u8, usize);

    #[repr(C)]
    pub struct PluginVTable {
        pub abi_version: u32,
        pub create: unsafe extern "C" fn() -> *mut c_void,
        pub clone: unsafe extern "C" fn(*const c_void) -> *mut c_void,
        pub destroy: unsafe extern "C" fn(*mut c_void),
        pub call: unsafe extern "C" fn(*mut c_void, u32, *const u8, usize, Sink, *mut c_void) -> i32,
    }

    pub unsafe fn emit(sink: Sink, ctx: *mut c_void, bytes: &[u8]) {
        sink(ctx, bytes.as_ptr(), bytes.len());
    }

    pub unsafe fn input<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
        if ptr.is_null() || len == 0 {
            &[]
        } else {
            std::slice::from_raw_parts(ptr, len)
        }
    }

    pub const DTYPE_BYTE: u8 = 0;

    /// A data frame borrowed from a request.
    pub struct Frame<'a> {
        pub dtype: u8,
        pub dims: Vec<u64>,
        pub payload: &'a [u8],
    }

    fn read_u32(b: &[u8], at: usize) -> Option<u32> {
        let s = b.get(at..at.checked_add(4)?)?;
        Some(u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
    }

    fn read_u64(b: &[u8], at: usize) -> Option<u64> {
        let s = b.get(at..at.checked_add(8)?)?;
        let mut a = [0u8; 8];
        a.copy_from_slice(s);
        Some(u64::from_le_bytes(a))
    }

    /// Frame at the start of `bytes`, with its encoded length.
    pub fn parse_frame(bytes: &[u8]) -> Option<(Frame<'_>, usize)> {
        if bytes.get(0..4)? != b"PJD1" {
            return None;
        }
        let dtype = *bytes.get(4)?;
        let ndims = read_u32(bytes, 5)? as usize;
        let mut at = 9usize;
        let mut dims = Vec::with_capacity(ndims.min(bytes.len() / 8));
        for _ in 0..ndims {
            dims.push(read_u64(bytes, at)?);
            at += 8;
        }
        let len = read_u64(bytes, at)? as usize;
        at += 8;
        let end = at.checked_add(len)?;
        let payload = bytes.get(at..end)?;
        Some((Frame { dtype, dims, payload }, end))
    }

    /// Split a compress/decompress request into (input, output shape).
    pub fn parse_request(bytes: &[u8]) -> Option<(Frame<'_>, Frame<'_>)> {
        let (input, used) = parse_frame(bytes)?;
        let (output, _) = parse_frame(bytes.get(used..)?)?;
        Some((input, output))
    }

    pub fn write_frame(dtype: u8, dims: &[u64], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(9 + dims.len() * 8 + 8 + payload.len());
        out.extend_from_slice(b"PJD1");
        out.push(dtype);
        out.extend_from_slice(&(dims.len() as u32).to_le_bytes());
        for d in dims {
            out.extend_from_slice(&d.to_le_bytes());
        }
        out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }
}
"#;
