//! src/data/encode.rs
//!
//! Data frame encoding.
//!
//! Design notes:
//! - Layout: magic(4) | dtype(1) | ndims(u32) | dims(u64 × ndims) | len(u64) | payload.
//! - All multi-byte integers little-endian.
//! - Field order must match `decode.rs` exactly; compiled plugins parse the same layout.
//! - Compress/decompress requests carry two frames back to back: the input, then
//!   the output's shape with an empty payload.

use crate::constants::MAGIC_PJD1;
use crate::data::types::PressioData;

/// Fixed prefix before the dims array: magic + dtype + ndims.
pub const FRAME_PREFIX_LEN: usize = 4 + 1 + 4;

/// Encoded size of `d` in bytes.
pub fn frame_len(d: &PressioData) -> usize {
    FRAME_PREFIX_LEN + d.dims().len() * 8 + 8 + d.size_in_bytes()
}

/// Serialize `d` into a data frame.
#[inline]
pub fn encode_frame(d: &PressioData) -> Vec<u8> {
    let mut out = Vec::with_capacity(frame_len(d));
    put_frame(&mut out, d, d.bytes());
    debug_assert_eq!(out.len(), frame_len(d), "encoding wrote incorrect length");
    out
}

/// Serialize only the dtype and dims of `d` (payload length 0).
pub fn encode_shape(d: &PressioData) -> Vec<u8> {
    let mut out = Vec::with_capacity(FRAME_PREFIX_LEN + d.dims().len() * 8 + 8);
    put_frame(&mut out, d, &[]);
    out
}

/// Request payload for compress/decompress: the input frame followed by the
/// shape frame of the caller's output buffer.
pub fn encode_request(input: &PressioData, output: &PressioData) -> Vec<u8> {
    let mut out = encode_frame(input);
    out.extend_from_slice(&encode_shape(output));
    out
}

fn put_frame(out: &mut Vec<u8>, d: &PressioData, payload: &[u8]) {
    fn put_u32(out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&v.to_le_bytes());
    }
    fn put_u64(out: &mut Vec<u8>, v: u64) {
        out.extend_from_slice(&v.to_le_bytes());
    }

    out.extend_from_slice(&MAGIC_PJD1);        // 0..4  magic
    out.push(d.dtype() as u8);                  // 4     dtype
    put_u32(out, d.dims().len() as u32);        // 5..9  ndims
    for &dim in d.dims() {
        put_u64(out, dim as u64);               // dims
    }
    put_u64(out, payload.len() as u64);         // payload length
    out.extend_from_slice(payload);             // payload
}
