//! This module contains the integer CDF 5/3 lifting kernels.
//!
//! The transform maps integers to integers exactly: predict and update steps use
//! flooring shifts, and the inverse replays them in reverse order. Both kernels
//! take their inputs already boundary-extended by the caller:
//! * `analyze` reads a signal extended by 2 samples per side (whole-point symmetric).
//! * `synthesize` reads bands extended by 1 sample per side.

use crate::error::WavepackError;
use crate::types::SampleType;

const OVERFLOW: WavepackError = WavepackError::CoefficientOverflow {
    sample_type: SampleType::Int64,
};

#[inline]
fn floor_half(v: i64) -> i64 {
    v >> 1
}

#[inline]
fn round_quarter(v: i64) -> Option<i64> {
    Some(v.checked_add(2)? >> 2)
}

/// Predict step: `odd - floor((left + right) / 2)`.
#[inline]
fn predict(odd: i64, left: i64, right: i64) -> Option<i64> {
    odd.checked_sub(floor_half(left.checked_add(right)?))
}

/// Update step: `even + round((d_left + d_right) / 4)`.
#[inline]
fn update(even: i64, d_left: i64, d_right: i64) -> Option<i64> {
    even.checked_add(round_quarter(d_left.checked_add(d_right)?)?)
}

/// Forward lifting of a signal of length `n`, given as `ext` (length `n + 4`).
///
/// Writes `ceil(n/2)` approximation and `floor(n/2)` detail coefficients. Fails
/// with `CoefficientOverflow` when an intermediate sum leaves the `i64` range.
pub fn analyze(ext: &[i64], n: usize, ca: &mut [i64], cd: &mut [i64]) -> Result<(), WavepackError> {
    // X(i) = ext[i + 2]
    let x = |i: isize| ext[(i + 2) as usize];
    let n_d = n / 2;
    let n_c = n_d + n % 2;

    for (i, d) in cd.iter_mut().enumerate().take(n_d) {
        let i = i as isize;
        *d = predict(x(2 * i + 1), x(2 * i), x(2 * i + 2)).ok_or(OVERFLOW)?;
    }

    let d_before = predict(x(-1), x(-2), x(0)).ok_or(OVERFLOW)?;
    let d0 = if n_d > 0 { cd[0] } else { 0 };
    ca[0] = update(x(0), d_before, d0).ok_or(OVERFLOW)?;
    for i in 1..n_d {
        ca[i] = update(x(2 * i as isize), cd[i - 1], cd[i]).ok_or(OVERFLOW)?;
    }
    if n % 2 == 1 && n_c > 1 {
        let i = n_c - 1;
        let ii = i as isize;
        let d_after = predict(x(2 * ii + 1), x(2 * ii), x(2 * ii + 2)).ok_or(OVERFLOW)?;
        ca[i] = update(x(2 * ii), cd[i - 1], d_after).ok_or(OVERFLOW)?;
    }
    Ok(())
}

/// Inverse lifting. `ca_ext` holds `m + 2` values and `cd_ext` the extended detail
/// band; `work` is resized to `2m`, and the first `out.len()` samples are emitted.
///
/// Coefficients that were not produced by `analyze` can overflow; that is reported
/// as `CoefficientOverflow` and `out` is left untouched.
pub fn synthesize(ca_ext: &[i64], cd_ext: &[i64], work: &mut Vec<i64>, out: &mut [i64]) -> Result<(), WavepackError> {
    let m = ca_ext.len() - 2;
    // Missing trailing detail (odd-length signals) only feeds the discarded sample.
    let d = |i: usize| cd_ext.get(i).copied().unwrap_or(0);
    // Inverse update: even = a - round((d_left + d_right) / 4).
    let even = |a: i64, d_left: i64, d_right: i64| {
        a.checked_sub(round_quarter(d_left.checked_add(d_right)?)?)
    };
    // Inverse predict: odd = d + floor((left + right) / 2).
    let odd = |d: i64, left: i64, right: i64| d.checked_add(floor_half(left.checked_add(right)?));

    work.clear();
    work.resize(2 * m, 0);
    for i in 0..m {
        work[2 * i] = even(ca_ext[i + 1], d(i), d(i + 1)).ok_or(OVERFLOW)?;
    }
    for i in 0..m.saturating_sub(1) {
        work[2 * i + 1] = odd(d(i + 1), work[2 * i], work[2 * i + 2]).ok_or(OVERFLOW)?;
    }
    if m > 0 {
        let after = even(ca_ext[m + 1], d(m), d(m + 1)).ok_or(OVERFLOW)?;
        work[2 * m - 1] = odd(d(m), work[2 * m - 2], after).ok_or(OVERFLOW)?;
    }

    let n = out.len();
    out.copy_from_slice(&work[..n]);
    Ok(())
}
