//! Dense arrays as BLOBs: little-endian f64 values in row-major order, with
//! the shape stored next to them as a JSON list.

use disagg_core::errors::StorageError;
use ndarray::{ArrayD, IxDyn};

/// Encode an array into its shape and byte payload.
pub fn encode_array(array: &ArrayD<f64>) -> (Vec<usize>, Vec<u8>) {
    let mut bytes = Vec::with_capacity(array.len() * 8);
    // `iter` walks logical (row-major) order whatever the memory layout.
    for value in array.iter() {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    (array.shape().to_vec(), bytes)
}

pub fn decode_array(shape: &[usize], bytes: &[u8]) -> Result<ArrayD<f64>, StorageError> {
    if bytes.len() % 8 != 0 {
        return Err(StorageError::Serialization {
            message: format!("array payload of {} bytes is not a whole number of f64", bytes.len()),
        });
    }
    let values: Vec<f64> = bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            f64::from_le_bytes(buf)
        })
        .collect();
    let expected: usize = shape.iter().product();
    if values.len() != expected {
        return Err(StorageError::Serialization {
            message: format!("shape {shape:?} needs {expected} values, payload has {}", values.len()),
        });
    }
    ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|e| StorageError::Serialization {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;

    #[test]
    fn transposed_views_are_written_in_logical_order() {
        let a = Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let t = a.t().to_owned().into_dyn();
        let (shape, bytes) = encode_array(&t);
        assert_eq!(shape, vec![3, 2]);
        let back = decode_array(&shape, &bytes).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.as_slice().unwrap(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn rejects_truncated_payload() {
        let err = decode_array(&[2], &[0u8; 12]).unwrap_err();
        assert!(matches!(err, StorageError::Serialization { .. }));
    }

    #[test]
    fn rejects_shape_mismatch() {
        let err = decode_array(&[3], &[0u8; 16]).unwrap_err();
        assert!(err.to_string().contains("needs 3 values"));
    }
}
