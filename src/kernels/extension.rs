//! This module contains the pure boundary-extension kernel.
//!
//! `extend` copies a signal into a buffer with `a` extra samples on each side,
//! filling the margins according to a `BoundaryMode`. The left and right margins
//! may use different modes; the synthesis stage of the symmetric filter banks
//! relies on that.

use crate::traits::KernelScalar;
use crate::wavelet::mode::BoundaryMode;

/// Writes `x` extended by `a` samples per side into `out` (resized to `x.len() + 2a`).
///
/// The caller guarantees `a < x.len()` and `x.len() >= 2`.
pub fn extend<T: KernelScalar>(
    x: &[T],
    a: usize,
    left: BoundaryMode,
    right: BoundaryMode,
    out: &mut Vec<T>,
) {
    let n = x.len();
    out.clear();
    out.resize(n + 2 * a, T::zero());
    out[a..a + n].copy_from_slice(x);
    if a == 0 {
        return;
    }

    for c in 0..a {
        out[c] = match left {
            BoundaryMode::Zpd => T::zero(),
            BoundaryMode::Symh => x[a - c - 1],
            BoundaryMode::Symw => x[a - c],
            BoundaryMode::Asymh => -x[a - c - 1],
            BoundaryMode::Asymw => -x[a - c],
            BoundaryMode::Sp0 => x[0],
            BoundaryMode::Sp1 => x[0] - (x[1] - x[0]) * T::from_usize(a - c),
            BoundaryMode::Ppd | BoundaryMode::Per => x[n - a + c],
        };
    }

    for c in 0..a {
        let r = c + n + a;
        match right {
            BoundaryMode::Zpd => out[r] = T::zero(),
            BoundaryMode::Symh => out[r] = x[n - c - 1],
            BoundaryMode::Symw => out[r] = x[n - c - 2],
            BoundaryMode::Asymh => out[r] = -x[n - c - 1],
            BoundaryMode::Asymw => out[r] = -x[n - c - 2],
            BoundaryMode::Sp0 => out[r] = x[n - 1],
            // Filled outermost first.
            BoundaryMode::Sp1 => {
                out[n + 2 * a - c - 1] = x[n - 1] - (x[n - 2] - x[n - 1]) * T::from_usize(a - c)
            }
            BoundaryMode::Ppd | BoundaryMode::Per => out[r] = x[c],
        }
    }
}
