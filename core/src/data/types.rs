//! data/types.rs
//! Typed n-dimensional buffers handed to compressors.
//!
//! Design notes:
//! - Payload is plain bytes in native element layout; `dtype` + `dims` give it shape.
//! - `empty` buffers carry shape but no payload (outputs the compressor will fill).
//! - Equality is structural: same dtype, same dims, same bytes.

use std::fmt;
use num_enum::TryFromPrimitive;

use crate::utils::enum_name_or_hex;

/// Element types (wire registry).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum DType {
    Byte   = 0x00,
    Int8   = 0x01,
    Int16  = 0x02,
    Int32  = 0x03,
    Int64  = 0x04,
    Uint8  = 0x05,
    Uint16 = 0x06,
    Uint32 = 0x07,
    Uint64 = 0x08,
    Float  = 0x09,
    Double = 0x0A,
    Bool   = 0x0B,
}

impl DType {
    pub fn size_of(self) -> usize {
        match self {
            DType::Byte | DType::Int8 | DType::Uint8 | DType::Bool => 1,
            DType::Int16 | DType::Uint16 => 2,
            DType::Int32 | DType::Uint32 | DType::Float => 4,
            DType::Int64 | DType::Uint64 | DType::Double => 8,
        }
    }

    pub fn verify(raw: u8) -> Result<DType, DataError> {
        DType::try_from_primitive(raw).map_err(|_| DataError::UnknownDType { raw })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    BadMagic { have: [u8; 4] },
    UnknownDType { raw: u8 },
    Truncated { have: usize, need: usize },
    TrailingBytes { extra: usize },
    ShapeMismatch { dims_bytes: usize, payload: usize },
    ShapeOverflow { dims: Vec<usize>, elem_size: usize },
    WrongDType { expected: DType, actual: DType },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DataError::*;
        match self {
            BadMagic { have } =>
                write!(f, "bad frame magic: {:02x?}", have),
            UnknownDType { raw } =>
                write!(f, "unknown dtype: {}", enum_name_or_hex::<DType>(*raw)),
            Truncated { have, need } =>
                write!(f, "frame truncated: have {} bytes, need {}", have, need),
            TrailingBytes { extra } =>
                write!(f, "frame has {} trailing bytes", extra),
            ShapeMismatch { dims_bytes, payload } =>
                write!(f, "payload of {} bytes does not match shape ({} bytes)", payload, dims_bytes),
            ShapeOverflow { dims, elem_size } =>
                write!(f, "shape {:?} of {}-byte elements overflows usize", dims, elem_size),
            WrongDType { expected, actual } =>
                write!(f, "expected dtype {:?}, found {:?}", expected, actual),
        }
    }
}

impl std::error::Error for DataError {}

/// Byte size of a `dtype` array shaped `dims`, rejecting shapes that overflow.
pub fn shape_bytes(dtype: DType, dims: &[usize]) -> Result<usize, DataError> {
    dims.iter()
        .try_fold(dtype.size_of(), |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| DataError::ShapeOverflow { dims: dims.to_vec(), elem_size: dtype.size_of() })
}

/// Typed n-dimensional buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct PressioData {
    dtype: DType,
    dims: Vec<usize>,
    bytes: Vec<u8>,
}

impl PressioData {
    /// Zero-filled buffer sized for `dims`.
    pub fn owning(dtype: DType, dims: &[usize]) -> Result<Self, DataError> {
        let len = shape_bytes(dtype, dims)?;
        Ok(Self { dtype, dims: dims.to_vec(), bytes: vec![0u8; len] })
    }

    /// Shape without payload; used for outputs.
    pub fn empty(dtype: DType, dims: &[usize]) -> Self {
        Self { dtype, dims: dims.to_vec(), bytes: Vec::new() }
    }

    /// Wrap raw bytes; a non-empty payload with non-empty `dims` must match the shape.
    /// The shape itself must be representable even when the payload is empty.
    pub fn from_bytes(dtype: DType, dims: &[usize], bytes: Vec<u8>) -> Result<Self, DataError> {
        let need = shape_bytes(dtype, dims)?;
        if !dims.is_empty() && !bytes.is_empty() && need != bytes.len() {
            return Err(DataError::ShapeMismatch { dims_bytes: need, payload: bytes.len() });
        }
        Ok(Self { dtype, dims: dims.to_vec(), bytes })
    }

    pub fn from_f32s(dims: &[usize], values: &[f32]) -> Result<Self, DataError> {
        let bytes = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        Self::from_bytes(DType::Float, dims, bytes)
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn dimension(&self, idx: usize) -> usize {
        self.dims.get(idx).copied().unwrap_or(0)
    }

    pub fn num_elements(&self) -> usize {
        if self.dims.is_empty() {
            0
        } else {
            self.dims.iter().fold(1usize, |acc, &d| acc.saturating_mul(d))
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn has_data(&self) -> bool {
        !self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Decode the payload as native-endian `f32`s.
    pub fn as_f32s(&self) -> Result<Vec<f32>, DataError> {
        if self.dtype != DType::Float {
            return Err(DataError::WrongDType { expected: DType::Float, actual: self.dtype });
        }
        Ok(self
            .bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}
