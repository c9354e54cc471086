// In: src/wavelet/bookkeeping.rs

//! The bookkeeping vector `L` and the size queries derived from it.
//!
//! For a `d`-dimensional decomposition of depth `n`, `L` holds
//! `(2^d - 1) * d * n + 2d` entries:
//! * the shape of the coarsest approximation band (`d` entries),
//! * for each level from coarsest (1) to finest (`n`), the shapes of its
//!   `2^d - 1` detail bands (`d` entries each),
//! * the original dims (`d` entries).
//!
//! Shapes are listed X first. Detail bands within a level are ordered by their
//! low/high pattern read X, Y, Z with low before high, so a 2D level stores LH
//! (approx x, detail y), HL, HH, and a 3D level stores LLH, LHL, LHH, HLL, HLH,
//! HHL, HHH.

use crate::error::WavepackError;
use crate::utils::{product, validate_dims};
use crate::wavelet::dwt::FilterBank;

/// Maximum dimensionality of a decomposition.
pub const MAX_DIMS: usize = 3;

/// Number of detail bands per level.
#[inline]
pub fn detail_bands(ndims: usize) -> usize {
    (1 << ndims) - 1
}

/// Length of `L` for a decomposition of `ndims` dimensions and depth `n`.
#[inline]
pub fn l_len(ndims: usize, n: usize) -> usize {
    detail_bands(ndims) * ndims * n + 2 * ndims
}

/// Infers the dimensionality of an `L` vector of depth `n` from its length.
pub fn ndims_from_l(l: &[usize], n: usize) -> Result<usize, WavepackError> {
    (1..=MAX_DIMS)
        .find(|&d| l_len(d, n) == l.len())
        .ok_or(WavepackError::BookkeepingMismatch {
            expected: l_len(1, n),
            actual: l.len(),
        })
}

/// `true` if band `band` (0 = all-low) is high-pass along the axis `letter` (0 = X).
#[inline]
pub fn is_high(band: usize, letter: usize, ndims: usize) -> bool {
    (band >> (ndims - 1 - letter)) & 1 == 1
}

/// Applies the single-level approximation length `k` times.
pub fn approxlength(bank: &FilterBank, len: usize, k: usize) -> usize {
    (0..k).fold(len, |acc, _| bank.approx_len(acc))
}

/// Shape of the approximation after `k` levels.
pub fn approx_dims(bank: &FilterBank, dims: &[usize], k: usize) -> Vec<usize> {
    dims.iter().map(|&len| approxlength(bank, len, k)).collect()
}

/// Computes `L` for `dims` and depth `n`.
pub fn compute_l(bank: &FilterBank, dims: &[usize], n: usize) -> Result<Vec<usize>, WavepackError> {
    validate_dims(dims, MAX_DIMS)?;
    let d = dims.len();
    let mut l = Vec::with_capacity(l_len(d, n));
    l.extend(approx_dims(bank, dims, n));
    for level in 1..=n {
        // The bands of level `level` split the approximation left after `n - level` steps.
        let parent = approx_dims(bank, dims, n - level);
        for band in 1..(1 << d) {
            for (letter, &len) in parent.iter().enumerate() {
                l.push(if is_high(band, letter, d) {
                    bank.detail_len(len)
                } else {
                    bank.approx_len(len)
                });
            }
        }
    }
    l.extend_from_slice(dims);
    Ok(l)
}

/// Total coefficient count of a decomposition of `dims` with depth `n`.
pub fn coefflength(bank: &FilterBank, dims: &[usize], n: usize) -> Result<usize, WavepackError> {
    let l = compute_l(bank, dims, n)?;
    coefflength_from_l(&l, dims.len())
}

/// Total coefficient count recorded in an existing `L`.
pub fn coefflength_from_l(l: &[usize], ndims: usize) -> Result<usize, WavepackError> {
    if ndims == 0 || l.len() < 2 * ndims {
        return Err(WavepackError::BookkeepingMismatch {
            expected: 2 * ndims.max(1),
            actual: l.len(),
        });
    }
    let shapes = &l[..l.len() - ndims];
    if shapes.len() % ndims != 0 {
        return Err(WavepackError::BookkeepingMismatch {
            expected: shapes.len() - shapes.len() % ndims + ndims,
            actual: l.len(),
        });
    }
    Ok(shapes.chunks(ndims).map(product).sum())
}

/// The original dims recorded at the end of `L`.
pub fn dims_from_l(l: &[usize], ndims: usize) -> &[usize] {
    &l[l.len() - ndims..]
}

/// Shape of the order-`level` reconstruction described by `L` (depth `n`).
pub fn approx_dims_from_l(bank: &FilterBank, l: &[usize], n: usize, level: usize) -> Result<Vec<usize>, WavepackError> {
    let d = ndims_from_l(l, n)?;
    let level = level.min(n);
    Ok(approx_dims(bank, dims_from_l(l, d), n - level))
}

/// Start offset of every band in `C`: the approximation first, then each level's
/// detail bands, coarsest level first.
pub fn band_offsets(l: &[usize], ndims: usize) -> Vec<usize> {
    let shapes = &l[..l.len() - ndims];
    let mut offsets = Vec::with_capacity(shapes.len() / ndims);
    let mut acc = 0;
    for shape in shapes.chunks(ndims) {
        offsets.push(acc);
        acc += product(shape);
    }
    offsets
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn bank(name: &str, mode: &str) -> FilterBank {
        FilterBank::new(name, Some(mode)).unwrap()
    }

    #[test]
    fn test_haar_per_1d() {
        let b = bank("haar", "per");
        assert_eq!(compute_l(&b, &[8], 1).unwrap(), vec![4, 4, 8]);
        assert_eq!(compute_l(&b, &[8], 3).unwrap(), vec![1, 1, 2, 4, 8]);
        assert_eq!(coefflength(&b, &[8], 3).unwrap(), 8);
    }

    #[test]
    fn test_shape_law() {
        let b = bank("bior4.4", "symw");
        for n in 0..=3 {
            assert_eq!(compute_l(&b, &[100], n).unwrap().len(), n + 2);
            assert_eq!(compute_l(&b, &[100, 90], n).unwrap().len(), 6 * n + 4);
            assert_eq!(compute_l(&b, &[100, 90, 80], n).unwrap().len(), 21 * n + 6);
        }
    }

    #[test]
    fn test_2d_band_shapes() {
        let b = bank("bior4.4", "symw");
        let l = compute_l(&b, &[17, 10], 1).unwrap();
        // cA, LH (approx x, detail y), HL, HH, dims
        assert_eq!(l, vec![9, 5, 9, 5, 8, 5, 8, 5, 17, 10]);
        assert_eq!(coefflength_from_l(&l, 2).unwrap(), 170);
        assert_eq!(band_offsets(&l, 2), vec![0, 45, 90, 130]);
    }

    #[test]
    fn test_3d_band_order() {
        let b = bank("haar", "zpd");
        let l = compute_l(&b, &[4, 6, 8], 1).unwrap();
        // zpd with haar: approx and detail are both (n + 1) / 2.
        assert_eq!(&l[..3], &[2, 3, 4]);
        assert_eq!(l.len(), 27);
        assert_eq!(&l[24..], &[4, 6, 8]);
        assert_eq!(coefflength_from_l(&l, 3).unwrap(), 8 * 24);
    }

    #[test]
    fn test_coefflength_forms_agree() {
        let b = bank("db3", "sp0");
        for dims in [vec![50], vec![40, 33], vec![24, 25, 26]] {
            for n in 0..=2 {
                let l = compute_l(&b, &dims, n).unwrap();
                assert_eq!(
                    coefflength(&b, &dims, n).unwrap(),
                    coefflength_from_l(&l, dims.len()).unwrap()
                );
                assert_eq!(ndims_from_l(&l, n).unwrap(), dims.len());
            }
        }
    }

    #[test]
    fn test_approx_dims_from_l() {
        let b = bank("bior4.4", "symw");
        let l = compute_l(&b, &[100, 60], 2).unwrap();
        assert_eq!(approx_dims_from_l(&b, &l, 2, 0).unwrap(), vec![25, 15]);
        assert_eq!(approx_dims_from_l(&b, &l, 2, 1).unwrap(), vec![50, 30]);
        assert_eq!(approx_dims_from_l(&b, &l, 2, 2).unwrap(), vec![100, 60]);
        assert_eq!(approx_dims_from_l(&b, &l, 2, 9).unwrap(), vec![100, 60]);
    }

    #[test]
    fn test_invalid_inputs() {
        let b = bank("haar", "per");
        assert!(compute_l(&b, &[], 1).is_err());
        assert!(compute_l(&b, &[1, 2, 3, 4], 1).is_err());
        assert!(ndims_from_l(&[1, 2, 3, 4, 5], 1).is_err());
    }
}
