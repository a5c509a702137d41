//! src/data/decode.rs
//!
//! Data frame decoding.
//!
//! Design notes:
//! - Field order must match `encode.rs`.
//! - Every length is bounds-checked before slicing; frames come from compiled
//!   code and are treated as untrusted input.
//! - Trailing bytes after the payload are rejected.

use crate::constants::MAGIC_PJD1;
use crate::data::encode::FRAME_PREFIX_LEN;
use crate::data::types::{DType, DataError, PressioData};

/// Deserialize a data frame into `PressioData`.
pub fn decode_frame(buf: &[u8]) -> Result<PressioData, DataError> {
    if buf.len() < FRAME_PREFIX_LEN {
        return Err(DataError::Truncated { have: buf.len(), need: FRAME_PREFIX_LEN });
    }

    let mut i = 0usize;
    fn take<'a>(buf: &'a [u8], i: &mut usize, n: usize) -> Result<&'a [u8], DataError> {
        let end = i.checked_add(n).ok_or(DataError::Truncated { have: buf.len(), need: usize::MAX })?;
        if end > buf.len() {
            return Err(DataError::Truncated { have: buf.len(), need: end });
        }
        let s = &buf[*i..end];
        *i = end;
        Ok(s)
    }
    fn get_u32(buf: &[u8], i: &mut usize) -> Result<u32, DataError> {
        let s = take(buf, i, 4)?;
        Ok(u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
    }
    fn get_u64(buf: &[u8], i: &mut usize) -> Result<u64, DataError> {
        let s = take(buf, i, 8)?;
        let mut b = [0u8; 8];
        b.copy_from_slice(s);
        Ok(u64::from_le_bytes(b))
    }

    let magic = take(buf, &mut i, 4)?;
    if magic != MAGIC_PJD1 {
        let mut have = [0u8; 4];
        have.copy_from_slice(magic);
        return Err(DataError::BadMagic { have });
    }
    let dtype = DType::verify(take(buf, &mut i, 1)?[0])?;
    let ndims = get_u32(buf, &mut i)? as usize;

    // Each dim needs 8 bytes; reject impossible counts before allocating.
    let remaining = buf.len() - i;
    if ndims > remaining / 8 {
        return Err(DataError::Truncated { have: buf.len(), need: i + ndims * 8 });
    }
    let mut dims = Vec::with_capacity(ndims);
    for _ in 0..ndims {
        dims.push(get_u64(buf, &mut i)? as usize);
    }

    let len = get_u64(buf, &mut i)? as usize;
    let payload = take(buf, &mut i, len)?.to_vec();

    if i != buf.len() {
        return Err(DataError::TrailingBytes { extra: buf.len() - i });
    }

    PressioData::from_bytes(dtype, &dims, payload)
}
