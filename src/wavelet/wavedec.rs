// In: src/wavelet/wavedec.rs

//! Multi-level decomposition and (partial) reconstruction of 1D, 2D and 3D arrays.
//!
//! Arrays are dense with X varying fastest. `wavedec` fills a flat coefficient
//! buffer `C` laid out coarse to fine, `[cA_n | level 1 details | ... | level n details]`,
//! and the bookkeeping vector `L` describing it (see `bookkeeping`). `appcoef`
//! runs any prefix of the inverse passes, yielding a lower-resolution
//! reconstruction, and `waverec` runs all of them.
//!
//! Internally a block is an `ndarray` array whose axes are in reverse letter order
//! (Z, Y, X), so the row-major iteration order matches the X-fastest memory layout.

use ndarray::{ArrayD, Axis, IxDyn, Slice};
use std::f64::consts::SQRT_2;

use crate::error::WavepackError;
use crate::traits::Sample;
use crate::utils::{product, validate_dims};
use crate::wavelet::bookkeeping::{self, band_offsets, is_high, MAX_DIMS};
use crate::wavelet::dwt::{analyze_axis, narrow, synthesize_axis, FilterBank, LevelScratch};

//==================================================================================
// 1. Block Helpers
//==================================================================================

fn reversed(dims: &[usize]) -> Vec<usize> {
    dims.iter().rev().copied().collect()
}

/// Wraps `data` (X fastest) as an array with axes Z, Y, X.
fn to_block<K>(dims: &[usize], data: Vec<K>) -> Result<ArrayD<K>, WavepackError> {
    ArrayD::from_shape_vec(IxDyn(&reversed(dims)), data).map_err(|_| WavepackError::InvalidShape {
        dims: dims.to_vec(),
        max_dims: MAX_DIMS,
    })
}

/// Axis-wise slice selecting band `band` of a block holding `la` approximation
/// values followed by detail values along every axis.
fn band_slice(band: usize, la: &[usize], total: &[usize], axis: Axis) -> Slice {
    let d = la.len();
    let letter = d - 1 - axis.index();
    if is_high(band, letter, d) {
        Slice::from(la[letter]..total[letter])
    } else {
        Slice::from(0..la[letter])
    }
}

//==================================================================================
// 2. Wavedec
//==================================================================================

/// Multi-level transform driver for one filter bank.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavedec {
    bank: FilterBank,
}

impl Wavedec {
    pub fn new(wavelet: &str, mode: Option<&str>) -> Result<Self, WavepackError> {
        Ok(Self::from_bank(FilterBank::new(wavelet, mode)?))
    }

    pub fn from_bank(bank: FilterBank) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &FilterBank {
        &self.bank
    }

    /// Deepest decomposition `dims` supports: the minimum over every axis.
    pub fn wmaxlev(&self, dims: &[usize]) -> usize {
        dims.iter().map(|&len| self.bank.wmaxlev(len)).min().unwrap_or(0)
    }

    pub fn approxlength(&self, len: usize, k: usize) -> usize {
        bookkeeping::approxlength(&self.bank, len, k)
    }

    pub fn approx_dims(&self, dims: &[usize], k: usize) -> Vec<usize> {
        bookkeeping::approx_dims(&self.bank, dims, k)
    }

    pub fn computel(&self, dims: &[usize], n: usize) -> Result<Vec<usize>, WavepackError> {
        bookkeeping::compute_l(&self.bank, dims, n)
    }

    pub fn coefflength(&self, dims: &[usize], n: usize) -> Result<usize, WavepackError> {
        bookkeeping::coefflength(&self.bank, dims, n)
    }

    pub fn coefflength_from_l(&self, l: &[usize], n: usize) -> Result<usize, WavepackError> {
        let d = bookkeeping::ndims_from_l(l, n)?;
        bookkeeping::coefflength_from_l(l, d)
    }

    /// Shape of the order-`level` reconstruction described by `l`.
    pub fn approx_dims_from_l(&self, l: &[usize], n: usize, level: usize) -> Result<Vec<usize>, WavepackError> {
        bookkeeping::approx_dims_from_l(&self.bank, l, n, level)
    }

    //==============================================================================
    // Forward
    //==============================================================================

    /// Decomposes `sig` (shape `dims`) `n` levels deep into `c`, and writes the
    /// bookkeeping vector into `l`.
    ///
    /// Every argument is validated before `c` or `l` is touched. The coefficients
    /// are staged in the kernel scalar and narrowed to `T` as a whole, so an
    /// integer signal whose coefficients overflow `T` fails with
    /// `CoefficientOverflow` and leaves `c` and `l` unchanged.
    pub fn wavedec<T: Sample>(
        &self,
        sig: &[T],
        dims: &[usize],
        n: usize,
        c: &mut [T],
        l: &mut Vec<usize>,
    ) -> Result<(), WavepackError> {
        self.bank.check_sample::<T>()?;
        validate_dims(dims, MAX_DIMS)?;
        if sig.len() != product(dims) {
            return Err(WavepackError::LengthMismatch {
                expected: product(dims),
                actual: sig.len(),
            });
        }
        let max = self.wmaxlev(dims);
        if n > max {
            return Err(WavepackError::LevelOutOfRange { requested: n, max });
        }
        let new_l = self.computel(dims, n)?;
        let d = dims.len();
        let clen = bookkeeping::coefflength_from_l(&new_l, d)?;
        if c.len() < clen {
            return Err(WavepackError::DestinationTooSmall {
                required: clen,
                actual: c.len(),
            });
        }

        let offsets = band_offsets(&new_l, d);
        let bands = bookkeeping::detail_bands(d);
        let mut scratch = LevelScratch::<T::Kernel>::default();
        let mut staged = vec![T::Kernel::default(); clen];
        let mut current = to_block(dims, sig.iter().map(|v| v.to_kernel()).collect())?;
        let mut cur_dims = dims.to_vec();

        for level in (1..=n).rev() {
            let mut t = current;
            for letter in 0..d {
                t = analyze_axis(&self.bank, t.view(), Axis(d - 1 - letter), &mut scratch)?;
            }
            let la: Vec<usize> = cur_dims.iter().map(|&len| self.bank.approx_len(len)).collect();
            let total: Vec<usize> = cur_dims
                .iter()
                .map(|&len| self.bank.approx_len(len) + self.bank.detail_len(len))
                .collect();

            for band in 1..=bands {
                let off = offsets[1 + (level - 1) * bands + (band - 1)];
                let view = t.slice_each_axis(|ax| band_slice(band, &la, &total, ax.axis));
                for (dst, v) in staged[off..].iter_mut().zip(view.iter()) {
                    *dst = *v;
                }
            }
            log::debug!(
                "wavedec level {}: {:?} -> approx {:?}",
                level,
                cur_dims,
                la
            );
            current = t
                .slice_each_axis(|ax| band_slice(0, &la, &total, ax.axis))
                .to_owned();
            cur_dims = la;
        }

        for (dst, v) in staged.iter_mut().zip(current.iter()) {
            *dst = *v;
        }
        c[..clen].copy_from_slice(&narrow::<T, _>(staged)?);
        *l = new_l;
        Ok(())
    }

    /// Owned form of `wavedec`.
    pub fn wavedec_to_vec<T: Sample>(&self, sig: &[T], dims: &[usize], n: usize) -> Result<(Vec<T>, Vec<usize>), WavepackError> {
        let clen = self.coefflength(dims, n)?;
        let mut c = vec![T::zero(); clen];
        let mut l = Vec::new();
        self.wavedec(sig, dims, n, &mut c, &mut l)?;
        Ok((c, l))
    }

    //==============================================================================
    // Inverse
    //==============================================================================

    /// Full reconstruction: all `n` inverse passes, no rescaling.
    pub fn waverec<T: Sample>(&self, c: &[T], l: &[usize], n: usize, sig: &mut [T]) -> Result<(), WavepackError> {
        self.appcoef(c, l, n, n, false, sig)
    }

    /// Reconstruction of order `level` (0 = the approximation band, `n` = full
    /// resolution). Levels outside `0..=n` are treated as `n`.
    ///
    /// With `normal`, a partial reconstruction is scaled by `1/sqrt(2)` per
    /// dimension per skipped level.
    pub fn appcoef<T: Sample>(
        &self,
        c: &[T],
        l: &[usize],
        n: usize,
        level: usize,
        normal: bool,
        sig: &mut [T],
    ) -> Result<(), WavepackError> {
        self.bank.check_sample::<T>()?;
        let d = bookkeeping::ndims_from_l(l, n)?;
        let dims = bookkeeping::dims_from_l(l, d).to_vec();
        validate_dims(&dims, MAX_DIMS)?;
        let expected_l = self.computel(&dims, n)?;
        if expected_l.as_slice() != l {
            return Err(WavepackError::BookkeepingMismatch {
                expected: expected_l.len(),
                actual: l.len(),
            });
        }
        let max = self.wmaxlev(&dims);
        if n > max {
            return Err(WavepackError::LevelOutOfRange { requested: n, max });
        }
        let clen = bookkeeping::coefflength_from_l(l, d)?;
        if c.len() < clen {
            return Err(WavepackError::LengthMismatch {
                expected: clen,
                actual: c.len(),
            });
        }
        let level = if level > n {
            log::warn!("appcoef: level {} out of range, using {}", level, n);
            n
        } else {
            level
        };
        let out_dims = self.approx_dims(&dims, n - level);
        let out_len = product(&out_dims);
        if sig.len() < out_len {
            return Err(WavepackError::DestinationTooSmall {
                required: out_len,
                actual: sig.len(),
            });
        }

        let offsets = band_offsets(l, d);
        let bands = bookkeeping::detail_bands(d);
        let mut scratch = LevelScratch::<T::Kernel>::default();
        let ca_dims = &l[..d];
        let mut current = to_block(
            ca_dims,
            c[..product(ca_dims)].iter().map(|v| v.to_kernel()).collect(),
        )?;

        for i in 1..=level {
            let target = self.approx_dims(&dims, n - i);
            let la: Vec<usize> = target.iter().map(|&len| self.bank.approx_len(len)).collect();
            let total: Vec<usize> = target
                .iter()
                .map(|&len| self.bank.approx_len(len) + self.bank.detail_len(len))
                .collect();

            let mut t = ArrayD::<T::Kernel>::zeros(IxDyn(&reversed(&total)));
            t.slice_each_axis_mut(|ax| band_slice(0, &la, &total, ax.axis))
                .assign(&current);
            for band in 1..=bands {
                let off = offsets[1 + (i - 1) * bands + (band - 1)];
                let mut view = t.slice_each_axis_mut(|ax| band_slice(band, &la, &total, ax.axis));
                for (dst, v) in view.iter_mut().zip(c[off..].iter()) {
                    *dst = v.to_kernel();
                }
            }
            // Undo the axis passes in reverse: Z, then Y, then X.
            for letter in (0..d).rev() {
                t = synthesize_axis(&self.bank, t.view(), Axis(d - 1 - letter), target[letter], &mut scratch)?;
            }
            current = t;
        }

        let scale = if normal && level != n {
            let per_level: f64 = (0..d).map(|_| SQRT_2).product();
            (level..n).fold(1.0, |s, _| s / per_level)
        } else {
            1.0
        };
        let values = narrow::<T, _>(current.iter().copied())?;
        for (dst, value) in sig.iter_mut().zip(values) {
            *dst = if scale == 1.0 {
                value
            } else {
                T::from_f64(value.to_f64() * scale)
            };
        }
        Ok(())
    }

    /// Owned form of `appcoef`.
    pub fn appcoef_to_vec<T: Sample>(&self, c: &[T], l: &[usize], n: usize, level: usize, normal: bool) -> Result<Vec<T>, WavepackError> {
        let out_dims = self.approx_dims_from_l(l, n, level)?;
        let mut sig = vec![T::zero(); product(&out_dims)];
        self.appcoef(c, l, n, level, normal, &mut sig)?;
        Ok(sig)
    }
}
