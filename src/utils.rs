//! This module provides shape helpers shared by the transform and the compressor.

use crate::error::WavepackError;

/// Number of elements in an array of the given dims.
#[inline]
pub fn product(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// Validates a shape: between 1 and `max_dims` entries, every entry at least 1.
pub fn validate_dims(dims: &[usize], max_dims: usize) -> Result<(), WavepackError> {
    if dims.is_empty() || dims.len() > max_dims || dims.iter().any(|&d| d == 0) {
        return Err(WavepackError::InvalidShape {
            dims: dims.to_vec(),
            max_dims,
        });
    }
    Ok(())
}
