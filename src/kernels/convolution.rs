//! This module contains the pure, stateless convolution kernels for real-valued
//! filter banks.
//!
//! The analysis kernels are stride-2 correlations of an already-extended signal.
//! Two synthesis kernels cover even- and odd-length filters, and a pair of circular
//! kernels implements the periodic transform without any explicit extension.
//!
//! All indexing assumptions are established by the caller (`wavelet::dwt`), which
//! sizes every buffer from the same length formulas.

//==================================================================================
// 1. Analysis
//==================================================================================

/// Stride-2 analysis of an extended signal `s`.
///
/// `cA[j] = sum_k lo[f-1-k] * s[low_offset + 2j + k]` and
/// `cD[j] = sum_k hi[f-1-k] * s[1 + 2j + k]`.
pub fn analyze(s: &[f64], lo: &[f64], hi: &[f64], low_offset: usize, ca: &mut [f64], cd: &mut [f64]) {
    let f = lo.len();
    for (j, out) in ca.iter_mut().enumerate() {
        let window = &s[low_offset + 2 * j..low_offset + 2 * j + f];
        *out = window
            .iter()
            .zip(lo.iter().rev())
            .map(|(x, h)| x * h)
            .sum();
    }
    for (j, out) in cd.iter_mut().enumerate() {
        let window = &s[1 + 2 * j..1 + 2 * j + f];
        *out = window
            .iter()
            .zip(hi.iter().rev())
            .map(|(x, h)| x * h)
            .sum();
    }
}

//==================================================================================
// 2. Synthesis
//==================================================================================

/// Synthesis for even-length filters.
///
/// `matlab` selects the phase used when the bands were produced by a plain
/// (non-symmetric) extension.
pub fn synthesize_even(ca: &[f64], cd: &[f64], lo: &[f64], hi: &[f64], matlab: bool, out: &mut [f64]) {
    let f = lo.len();
    let early_phase = matlab || (f >> 1) % 2 == 1;
    for (yi, y) in out.iter_mut().enumerate() {
        let odd = yi % 2 == 1;
        let (mut xi, start) = if early_phase {
            (yi >> 1, if odd { f - 1 } else { f - 2 })
        } else {
            ((yi + 1) >> 1, if odd { f - 2 } else { f - 1 })
        };
        let mut acc = 0.0;
        for k in (0..=start).rev().step_by(2) {
            acc += lo[k] * ca[xi] + hi[k] * cd[xi];
            xi += 1;
        }
        *y = acc;
    }
}

/// Synthesis for odd-length filters; the two bands run half a sample out of phase.
pub fn synthesize_odd(ca: &[f64], cd: &[f64], lo: &[f64], hi: &[f64], out: &mut [f64]) {
    let f = lo.len();
    for (yi, y) in out.iter_mut().enumerate() {
        let odd = yi % 2 == 1;
        let mut acc = 0.0;

        let mut xi = (yi + 1) >> 1;
        let start = if odd { f - 2 } else { f - 1 };
        for k in (0..=start).rev().step_by(2) {
            acc += lo[k] * ca[xi];
            xi += 1;
        }

        let mut xi = yi >> 1;
        let start = if odd { f - 1 } else { f - 2 };
        for k in (0..=start).rev().step_by(2) {
            acc += hi[k] * cd[xi];
            xi += 1;
        }
        *y = acc;
    }
}

//==================================================================================
// 3. Periodic Transform
//==================================================================================

/// Phase offsets of the low and high band for a filter of length `f`.
fn periodic_offsets(f: usize) -> (isize, isize) {
    let f = f as isize;
    if f % 2 == 0 {
        let a = -(f / 2 - 1);
        (a, a)
    } else {
        let a = -((f - 1) / 2);
        (a, a + 1)
    }
}

/// Circular analysis. An odd-length `x` is padded by repeating its last sample;
/// both bands have length `ceil(n / 2)`.
pub fn analyze_periodic(x: &[f64], lo: &[f64], hi: &[f64], ca: &mut [f64], cd: &mut [f64]) {
    let n = x.len();
    let padded = (n + n % 2) as isize;
    let f = lo.len();
    let (a, b) = periodic_offsets(f);
    let sample = |i: isize| -> f64 {
        let idx = i.rem_euclid(padded) as usize;
        x[idx.min(n - 1)]
    };

    for (j, (out_a, out_d)) in ca.iter_mut().zip(cd.iter_mut()).enumerate() {
        let base = 2 * j as isize;
        let mut acc_a = 0.0;
        let mut acc_d = 0.0;
        for k in 0..f {
            acc_a += lo[f - 1 - k] * sample(base + a + k as isize);
            acc_d += hi[f - 1 - k] * sample(base + b + k as isize);
        }
        *out_a = acc_a;
        *out_d = acc_d;
    }
}

/// Circular synthesis into `scratch` (length `2 * ca.len()`), truncated into `out`.
pub fn synthesize_periodic(
    ca: &[f64],
    cd: &[f64],
    lo: &[f64],
    hi: &[f64],
    scratch: &mut Vec<f64>,
    out: &mut [f64],
) {
    let m = ca.len();
    let padded = 2 * m as isize;
    let f = lo.len();
    let (a, b) = periodic_offsets(f);

    scratch.clear();
    scratch.resize(2 * m, 0.0);
    for j in 0..m {
        let base = 2 * j as isize;
        for k in 0..f {
            let ia = (base + a + k as isize).rem_euclid(padded) as usize;
            let ib = (base + b + k as isize).rem_euclid(padded) as usize;
            scratch[ia] += lo[k] * ca[j];
            scratch[ib] += hi[k] * cd[j];
        }
    }
    let n = out.len();
    out.copy_from_slice(&scratch[..n]);
}
