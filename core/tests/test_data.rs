// This suite is strict and designed to catch:

// * frame layout drift between encode and decode
// * acceptance of truncated or padded frames
// * dtype registry widening

#[cfg(test)]
mod tests {
    use jit_core::constants::MAGIC_PJD1;
    use jit_core::data::{
        decode_frame, encode_frame, encode_request, encode_shape, frame_len, DType, DataError,
        PressioData,
    };

    fn grid_10x10() -> PressioData {
        let mut values = Vec::with_capacity(100);
        for j in 0..10 {
            for i in 0..10 {
                values.push((i * j) as f32);
            }
        }
        PressioData::from_f32s(&[10, 10], &values).unwrap()
    }

    #[test]
    fn frame_preserves_float_grid() {
        let d = grid_10x10();
        let frame = encode_frame(&d);
        assert_eq!(frame.len(), frame_len(&d));
        assert_eq!(&frame[0..4], &MAGIC_PJD1);

        let back = decode_frame(&frame).unwrap();
        assert_eq!(back, d);
        assert_eq!(back.as_f32s().unwrap()[99], 81.0);
    }

    #[test]
    fn empty_buffer_keeps_shape() {
        let d = PressioData::empty(DType::Byte, &[10, 10]);
        let back = decode_frame(&encode_frame(&d)).unwrap();
        assert_eq!(back.dims(), &[10, 10]);
        assert!(!back.has_data());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut frame = encode_frame(&grid_10x10());
        frame[0] = b'X';
        assert!(matches!(decode_frame(&frame), Err(DataError::BadMagic { .. })));
    }

    #[test]
    fn rejects_unknown_dtype() {
        let mut frame = encode_frame(&grid_10x10());
        frame[4] = 0xEE;
        let err = decode_frame(&frame).unwrap_err();
        assert_eq!(err, DataError::UnknownDType { raw: 0xEE });
        assert!(err.to_string().contains("0xee"));
    }

    #[test]
    fn rejects_truncation_and_trailing_bytes() {
        let frame = encode_frame(&grid_10x10());
        assert!(matches!(
            decode_frame(&frame[..frame.len() - 1]),
            Err(DataError::Truncated { .. })
        ));
        assert!(matches!(decode_frame(&frame[..3]), Err(DataError::Truncated { .. })));

        let mut padded = frame.clone();
        padded.push(0);
        assert_eq!(decode_frame(&padded), Err(DataError::TrailingBytes { extra: 1 }));
    }

    #[test]
    fn rejects_absurd_dimension_count() {
        let mut frame = MAGIC_PJD1.to_vec();
        frame.push(DType::Byte as u8);
        frame.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(decode_frame(&frame), Err(DataError::Truncated { .. })));
    }

    #[test]
    fn shape_must_match_payload() {
        let err = PressioData::from_bytes(DType::Float, &[2, 2], vec![0u8; 15]).unwrap_err();
        assert_eq!(err, DataError::ShapeMismatch { dims_bytes: 16, payload: 15 });
    }

    #[test]
    fn owning_is_zeroed_and_sized() {
        let d = PressioData::owning(DType::Double, &[3, 4]).unwrap();
        assert_eq!(d.num_elements(), 12);
        assert_eq!(d.size_in_bytes(), 96);
        assert!(d.bytes().iter().all(|&b| b == 0));
        assert!(d.as_f32s().is_err());
    }

    #[test]
    fn overflowing_shape_in_frame_is_rejected() {
        let mut frame = MAGIC_PJD1.to_vec();
        frame.push(DType::Float as u8);
        frame.extend_from_slice(&2u32.to_le_bytes());
        frame.extend_from_slice(&(1u64 << 62).to_le_bytes());
        frame.extend_from_slice(&8u64.to_le_bytes());
        frame.extend_from_slice(&4u64.to_le_bytes());
        frame.extend_from_slice(&[0u8; 4]);

        let err = decode_frame(&frame).unwrap_err();
        assert!(matches!(err, DataError::ShapeOverflow { elem_size: 4, .. }));
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn overflowing_shape_is_rejected_without_payload() {
        let huge = [usize::MAX, 2];
        assert!(matches!(
            PressioData::from_bytes(DType::Byte, &huge, Vec::new()),
            Err(DataError::ShapeOverflow { .. })
        ));
        assert!(matches!(
            PressioData::owning(DType::Int16, &[usize::MAX / 2 + 1]),
            Err(DataError::ShapeOverflow { .. })
        ));
        assert_eq!(PressioData::empty(DType::Byte, &huge).num_elements(), usize::MAX);
    }

    #[test]
    fn request_carries_input_then_output_shape() {
        let input = grid_10x10();
        let output = PressioData::owning(DType::Float, &[5, 20]).unwrap();
        let request = encode_request(&input, &output);

        let first = encode_frame(&input);
        assert_eq!(&request[..first.len()], &first[..]);

        let shape = decode_frame(&request[first.len()..]).unwrap();
        assert_eq!(shape.dtype(), DType::Float);
        assert_eq!(shape.dims(), &[5, 20]);
        assert!(!shape.has_data());
        assert_eq!(encode_shape(&output), &request[first.len()..]);
    }

    #[test]
    fn payload_edits_survive_encoding() {
        let mut d = PressioData::owning(DType::Uint8, &[4]).unwrap();
        d.bytes_mut().copy_from_slice(&[9, 8, 7, 6]);
        let back = decode_frame(&encode_frame(&d)).unwrap();
        assert_eq!(back.into_bytes(), vec![9, 8, 7, 6]);
    }
}
