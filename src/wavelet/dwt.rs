// In: src/wavelet/dwt.rs

//! Single-level forward and inverse transforms.
//!
//! A `FilterBank` pairs a `WaveletFilter` with a `BoundaryMode` and knows the
//! band lengths that pairing produces. The 1D transform of one lane is provided by
//! `LevelTransform`, implemented once for `f64` (convolution) and once for `i64`
//! (lifting). `analyze_axis`/`synthesize_axis` apply it along one axis of an
//! N-dimensional array, which is how 2D and 3D levels are built.

use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};
use num_traits::Zero;

use crate::error::WavepackError;
use crate::kernels::{convolution, extension::extend, lifting};
use crate::traits::{KernelScalar, Sample};
use crate::wavelet::family::WaveletFilter;
use crate::wavelet::mode::BoundaryMode;

//==================================================================================
// 1. FilterBank
//==================================================================================

/// A wavelet paired with the boundary mode it is applied under.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBank {
    filter: WaveletFilter,
    mode: BoundaryMode,
}

impl FilterBank {
    /// Looks up `wavelet` and parses `mode`; `None` selects the wavelet's default mode.
    pub fn new(wavelet: &str, mode: Option<&str>) -> Result<Self, WavepackError> {
        let filter = WaveletFilter::from_name(wavelet)?;
        let mode = match mode {
            Some(m) => m.parse()?,
            None => filter.default_mode(),
        };
        Self::from_parts(filter, mode)
    }

    pub fn from_parts(filter: WaveletFilter, mode: BoundaryMode) -> Result<Self, WavepackError> {
        if !filter.supports_mode(mode) {
            return Err(WavepackError::InvalidPairing {
                wavelet: filter.name().to_string(),
                mode: mode.to_string(),
            });
        }
        Ok(Self { filter, mode })
    }

    pub fn filter(&self) -> &WaveletFilter {
        &self.filter
    }

    pub fn name(&self) -> &str {
        self.filter.name()
    }

    pub fn mode(&self) -> BoundaryMode {
        self.mode
    }

    pub fn filter_len(&self) -> usize {
        self.filter.filter_len()
    }

    pub fn is_symmetric(&self) -> bool {
        self.filter.is_symmetric()
    }

    pub fn is_lifting(&self) -> bool {
        self.filter.is_lifting()
    }

    /// True when the filter's symmetry matches the mode's symmetry, which lets the
    /// transform produce a critically sampled output.
    pub fn symmetric_convolution(&self) -> bool {
        let odd = self.filter_len() % 2 == 1;
        self.is_symmetric()
            && ((self.mode == BoundaryMode::Symw && odd)
                || (self.mode == BoundaryMode::Symh && !odd))
    }

    /// Number of approximation coefficients a signal of length `n` produces.
    pub fn approx_len(&self, n: usize) -> usize {
        if self.mode == BoundaryMode::Per || self.symmetric_convolution() {
            n.div_ceil(2)
        } else {
            (n + self.filter_len() - 1) / 2
        }
    }

    /// Number of detail coefficients a signal of length `n` produces.
    pub fn detail_len(&self, n: usize) -> usize {
        if self.mode == BoundaryMode::Per {
            n.div_ceil(2)
        } else if self.symmetric_convolution() {
            n / 2
        } else {
            (n + self.filter_len() - 1) / 2
        }
    }

    /// Maximum number of levels a signal of length `n` supports.
    pub fn wmaxlev(&self, n: usize) -> usize {
        let f = self.filter_len();
        let mut levels = 0;
        let mut span = f;
        while span <= n {
            levels += 1;
            span = match span.checked_mul(2) {
                Some(s) => s,
                None => break,
            };
        }
        levels
    }

    /// Fails unless this bank can transform samples of type `T`.
    pub fn check_sample<T: Sample>(&self) -> Result<(), WavepackError> {
        if self.is_lifting() != T::SAMPLE_TYPE.is_integer() {
            return Err(WavepackError::UnsupportedSampleType {
                wavelet: self.name().to_string(),
                sample_type: T::SAMPLE_TYPE,
            });
        }
        Ok(())
    }

    fn check_signal_len(&self, n: usize) -> Result<(), WavepackError> {
        if self.wmaxlev(n) < 1 {
            return Err(WavepackError::SignalTooShort {
                len: n,
                filter_len: self.filter_len(),
            });
        }
        Ok(())
    }

    //==============================================================================
    // 1D Public API
    //==============================================================================

    /// One level of forward transform. `ca`/`cd` must hold exactly
    /// `approx_len(n)`/`detail_len(n)` values.
    pub fn dwt<T: Sample>(&self, x: &[T], ca: &mut [T], cd: &mut [T]) -> Result<(), WavepackError> {
        self.check_sample::<T>()?;
        let n = x.len();
        self.check_signal_len(n)?;
        check_len(ca.len(), self.approx_len(n))?;
        check_len(cd.len(), self.detail_len(n))?;

        let input: Vec<T::Kernel> = x.iter().map(|v| v.to_kernel()).collect();
        let mut a = vec![T::Kernel::zero(); ca.len()];
        let mut d = vec![T::Kernel::zero(); cd.len()];
        let mut scratch = LevelScratch::default();
        T::Kernel::analyze(self, &input, &mut a, &mut d, &mut scratch)?;
        let a = narrow::<T, _>(a)?;
        let d = narrow::<T, _>(d)?;
        ca.copy_from_slice(&a);
        cd.copy_from_slice(&d);
        Ok(())
    }

    /// One level of inverse transform into `out`, whose length is the original signal length.
    pub fn idwt<T: Sample>(&self, ca: &[T], cd: &[T], out: &mut [T]) -> Result<(), WavepackError> {
        self.check_sample::<T>()?;
        let n = out.len();
        self.check_signal_len(n)?;
        check_len(ca.len(), self.approx_len(n))?;
        check_len(cd.len(), self.detail_len(n))?;

        let a: Vec<T::Kernel> = ca.iter().map(|v| v.to_kernel()).collect();
        let d: Vec<T::Kernel> = cd.iter().map(|v| v.to_kernel()).collect();
        let mut y = vec![T::Kernel::zero(); n];
        let mut scratch = LevelScratch::default();
        T::Kernel::synthesize(self, &a, &d, &mut y, &mut scratch)?;
        out.copy_from_slice(&narrow::<T, _>(y)?);
        Ok(())
    }
}

/// Converts kernel values back to `T`, failing on the first one that does not fit.
pub(crate) fn narrow<T, I>(values: I) -> Result<Vec<T>, WavepackError>
where
    T: Sample,
    I: IntoIterator<Item = T::Kernel>,
{
    values.into_iter().map(T::from_kernel).collect()
}

fn check_len(actual: usize, expected: usize) -> Result<(), WavepackError> {
    if actual != expected {
        return Err(WavepackError::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// Boundary modes for the extended bands fed to symmetric synthesis:
/// `(approx right, detail left, detail right)`. The approximation band's left
/// margin always uses the bank's own mode.
fn synthesis_modes(mode: BoundaryMode, odd_signal: bool) -> (BoundaryMode, BoundaryMode, BoundaryMode) {
    use BoundaryMode::*;
    match mode {
        Symh => (
            if odd_signal { Symw } else { Symh },
            Asymh,
            if odd_signal { Asymw } else { Asymh },
        ),
        _ => (
            if odd_signal { Symw } else { Symh },
            Symh,
            if odd_signal { Symh } else { Symw },
        ),
    }
}

//==================================================================================
// 2. Per-Lane Kernels
//==================================================================================

/// Reusable buffers for one level of transform.
#[derive(Debug, Default)]
pub struct LevelScratch<K> {
    ext: Vec<K>,
    ext_d: Vec<K>,
    work: Vec<K>,
}

/// One level of transform over a single lane, in a kernel scalar.
///
/// Callers guarantee the lane is at least one filter long and the band slices are
/// sized by `approx_len`/`detail_len`. Integer kernels fail with
/// `CoefficientOverflow` instead of wrapping.
pub trait LevelTransform: KernelScalar {
    fn analyze(
        bank: &FilterBank,
        x: &[Self],
        ca: &mut [Self],
        cd: &mut [Self],
        scratch: &mut LevelScratch<Self>,
    ) -> Result<(), WavepackError>;

    fn synthesize(
        bank: &FilterBank,
        ca: &[Self],
        cd: &[Self],
        out: &mut [Self],
        scratch: &mut LevelScratch<Self>,
    ) -> Result<(), WavepackError>;
}

/// Extends both bands for symmetric synthesis and pads them to a common length.
fn extend_bands<K: KernelScalar>(bank: &FilterBank, ca: &[K], cd: &[K], n: usize, scratch: &mut LevelScratch<K>) {
    let mode = bank.mode();
    let e = bank.filter_len() >> 2;
    let (ca_right, cd_left, cd_right) = synthesis_modes(mode, n % 2 == 1);

    extend(ca, e, mode, ca_right, &mut scratch.ext);
    if mode == BoundaryMode::Symh && ca.len() > cd.len() {
        scratch.work.clear();
        scratch.work.extend_from_slice(cd);
        scratch.work.push(K::zero());
        extend(&scratch.work, e, cd_left, cd_right, &mut scratch.ext_d);
    } else {
        extend(cd, e, cd_left, cd_right, &mut scratch.ext_d);
    }
    let len = scratch.ext.len().max(scratch.ext_d.len());
    scratch.ext.resize(len, K::zero());
    scratch.ext_d.resize(len, K::zero());
}

impl LevelTransform for f64 {
    fn analyze(
        bank: &FilterBank,
        x: &[f64],
        ca: &mut [f64],
        cd: &mut [f64],
        scratch: &mut LevelScratch<f64>,
    ) -> Result<(), WavepackError> {
        let w = bank.filter();
        let f = bank.filter_len();
        if bank.mode() == BoundaryMode::Per {
            convolution::analyze_periodic(x, w.lo_d(), w.hi_d(), ca, cd);
            return Ok(());
        }
        let e = if bank.symmetric_convolution() { f >> 1 } else { f - 1 };
        extend(x, e, bank.mode(), bank.mode(), &mut scratch.ext);
        let low_offset = if f % 2 == 0 { 1 } else { 0 };
        convolution::analyze(&scratch.ext, w.lo_d(), w.hi_d(), low_offset, ca, cd);
        Ok(())
    }

    fn synthesize(
        bank: &FilterBank,
        ca: &[f64],
        cd: &[f64],
        out: &mut [f64],
        scratch: &mut LevelScratch<f64>,
    ) -> Result<(), WavepackError> {
        let w = bank.filter();
        if bank.mode() == BoundaryMode::Per {
            convolution::synthesize_periodic(ca, cd, w.lo_r(), w.hi_r(), &mut scratch.work, out);
        } else if !bank.symmetric_convolution() {
            convolution::synthesize_even(ca, cd, w.lo_r(), w.hi_r(), true, out);
        } else {
            extend_bands(bank, ca, cd, out.len(), scratch);
            if bank.filter_len() % 2 == 1 {
                convolution::synthesize_odd(&scratch.ext, &scratch.ext_d, w.lo_r(), w.hi_r(), out);
            } else {
                convolution::synthesize_even(&scratch.ext, &scratch.ext_d, w.lo_r(), w.hi_r(), false, out);
            }
        }
        Ok(())
    }
}

impl LevelTransform for i64 {
    fn analyze(
        bank: &FilterBank,
        x: &[i64],
        ca: &mut [i64],
        cd: &mut [i64],
        scratch: &mut LevelScratch<i64>,
    ) -> Result<(), WavepackError> {
        let e = bank.filter_len() >> 1;
        extend(x, e, BoundaryMode::Symw, BoundaryMode::Symw, &mut scratch.ext);
        lifting::analyze(&scratch.ext, x.len(), ca, cd)
    }

    fn synthesize(
        bank: &FilterBank,
        ca: &[i64],
        cd: &[i64],
        out: &mut [i64],
        scratch: &mut LevelScratch<i64>,
    ) -> Result<(), WavepackError> {
        extend_bands(bank, ca, cd, out.len(), scratch);
        lifting::synthesize(&scratch.ext, &scratch.ext_d, &mut scratch.work, out)
    }
}

//==================================================================================
// 3. Separable N-D Passes
//==================================================================================

/// Transforms every lane of `input` along `axis`. The output has the same shape
/// except along `axis`, where it holds the approximation band followed by the
/// detail band.
pub fn analyze_axis<K: LevelTransform>(
    bank: &FilterBank,
    input: ArrayViewD<'_, K>,
    axis: Axis,
    scratch: &mut LevelScratch<K>,
) -> Result<ArrayD<K>, WavepackError> {
    let n = input.len_of(axis);
    let la = bank.approx_len(n);
    let ld = bank.detail_len(n);
    let mut shape = input.shape().to_vec();
    shape[axis.index()] = la + ld;
    let mut output = ArrayD::<K>::zeros(IxDyn(&shape));

    let mut lane = Vec::with_capacity(n);
    let mut ca = vec![K::zero(); la];
    let mut cd = vec![K::zero(); ld];
    for (src, mut dst) in input.lanes(axis).into_iter().zip(output.lanes_mut(axis)) {
        lane.clear();
        lane.extend(src.iter().copied());
        K::analyze(bank, &lane, &mut ca, &mut cd, scratch)?;
        for (d, v) in dst.iter_mut().zip(ca.iter().chain(cd.iter())) {
            *d = *v;
        }
    }
    Ok(output)
}

/// Inverts `analyze_axis`: every lane along `axis` holds `approx_len(out_len)`
/// approximation values followed by the detail values; the result has `out_len`
/// samples along `axis`.
pub fn synthesize_axis<K: LevelTransform>(
    bank: &FilterBank,
    input: ArrayViewD<'_, K>,
    axis: Axis,
    out_len: usize,
    scratch: &mut LevelScratch<K>,
) -> Result<ArrayD<K>, WavepackError> {
    let la = bank.approx_len(out_len);
    let mut shape = input.shape().to_vec();
    shape[axis.index()] = out_len;
    let mut output = ArrayD::<K>::zeros(IxDyn(&shape));

    let mut lane = Vec::with_capacity(input.len_of(axis));
    let mut y = vec![K::zero(); out_len];
    for (src, mut dst) in input.lanes(axis).into_iter().zip(output.lanes_mut(axis)) {
        lane.clear();
        lane.extend(src.iter().copied());
        let (ca, cd) = lane.split_at(la);
        K::synthesize(bank, ca, cd, &mut y, scratch)?;
        for (d, v) in dst.iter_mut().zip(y.iter()) {
            *d = *v;
        }
    }
    Ok(output)
}
