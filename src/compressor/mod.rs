// In: src/compressor/mod.rs

//! The stateful, shape-bound compressor.
//!
//! A `Compressor` is built once per block shape and wavelet and reused for every
//! block of that shape. It owns the coefficient arena and the bookkeeping vector,
//! transforms a block at full depth, and keeps the largest-magnitude coefficients:
//!
//! * `compress` / `decompress` handle a single retained set.
//! * `decompose` splits the ranked coefficients into successive refinement
//!   partitions, and `reconstruct` rebuilds from any prefix of them at any
//!   resolution.
//!
//! The retained indices travel in `SignificanceMap`s over the 1D universe
//! `[num_coefficients()]`.

use std::fmt;

use crate::config::CompressorConfig;
use crate::error::WavepackError;
use crate::sigmap::SignificanceMap;
use crate::traits::Sample;
use crate::utils::{product, validate_dims};
use crate::wavelet::bookkeeping::MAX_DIMS;
use crate::wavelet::{BoundaryMode, FilterBank, Wavedec};

pub mod arena;
pub mod info;

use arena::ScratchArena;
pub use info::CompressionInfo;

//==================================================================================
// 1. Ranking
//==================================================================================

/// Orders the detail indices `numkeep..c.len()` by descending magnitude, ties by
/// ascending index.
fn rank_details<T: Sample>(c: &[T], numkeep: usize, order: &mut Vec<usize>) {
    order.clear();
    order.extend(numkeep..c.len());
    order.sort_unstable_by(|&a, &b| c[b].magnitude_cmp(&c[a]).then(a.cmp(&b)));
}

/// Writes `c[idx]` for each index of `indices` into `dst` and records it in `map`.
fn emit<T: Sample>(c: &[T], indices: &[usize], dst: &mut [T], map: &mut SignificanceMap) -> Result<(), WavepackError> {
    for (slot, &idx) in dst.iter_mut().zip(indices) {
        *slot = c[idx];
        map.set(idx)?;
    }
    Ok(())
}

//==================================================================================
// 2. Compressor
//==================================================================================

#[derive(Debug, Clone)]
pub struct Compressor {
    wavedec: Wavedec,
    dims: Vec<usize>,
    nlevels: usize,
    l: Vec<usize>,
    clen: usize,
    arena: ScratchArena,
    order: Vec<usize>,
    keep_approx: bool,
    clamp_min: Option<f64>,
    clamp_max: Option<f64>,
    epsilon: Option<f64>,
}

impl Compressor {
    /// Creates a compressor for blocks of shape `dims` (X first, 1 to 3 entries).
    pub fn new(dims: &[usize], wavelet: &str, mode: Option<&str>) -> Result<Self, WavepackError> {
        let mut compressor = Self {
            wavedec: Wavedec::new(wavelet, mode)?,
            dims: Vec::new(),
            nlevels: 0,
            l: Vec::new(),
            clen: 0,
            arena: ScratchArena::new(),
            order: Vec::new(),
            keep_approx: true,
            clamp_min: None,
            clamp_max: None,
            epsilon: None,
        };
        compressor.reshape(dims)?;
        log::info!(
            "compressor ready: dims {:?}, wavelet {} ({}), {} levels, {} coefficients",
            compressor.dims,
            compressor.wavelet(),
            compressor.mode(),
            compressor.nlevels,
            compressor.clen
        );
        Ok(compressor)
    }

    pub fn from_config(dims: &[usize], config: &CompressorConfig) -> Result<Self, WavepackError> {
        let mut compressor = Self::new(dims, &config.wavelet, config.mode.as_deref())?;
        compressor.keep_approx = config.keep_approx;
        compressor.clamp_min = config.clamp_min;
        compressor.clamp_max = config.clamp_max;
        compressor.epsilon = config.epsilon;
        Ok(compressor)
    }

    /// Rebinds the compressor to a new block shape. Previous coefficients and
    /// bookkeeping are discarded.
    pub fn reshape(&mut self, dims: &[usize]) -> Result<(), WavepackError> {
        validate_dims(dims, MAX_DIMS)?;
        let nlevels = self.wavedec.wmaxlev(dims);
        let l = self.wavedec.computel(dims, nlevels)?;
        let clen = self.wavedec.coefflength_from_l(&l, nlevels)?;
        self.arena.resize(clen * std::mem::size_of::<u64>());
        self.order = Vec::with_capacity(clen);
        self.dims = dims.to_vec();
        self.nlevels = nlevels;
        self.l = l;
        self.clen = clen;
        Ok(())
    }

    //==============================================================================
    // Accessors
    //==============================================================================

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn num_levels(&self) -> usize {
        self.nlevels
    }

    /// Length of the coefficient buffer, and the universe of every map this
    /// compressor produces or accepts.
    pub fn num_coefficients(&self) -> usize {
        self.clen
    }

    pub fn bookkeeping(&self) -> &[usize] {
        &self.l
    }

    pub fn wavelet(&self) -> &str {
        self.wavedec.bank().name()
    }

    pub fn mode(&self) -> BoundaryMode {
        self.wavedec.bank().mode()
    }

    pub fn keep_approx(&self) -> bool {
        self.keep_approx
    }

    pub fn set_keep_approx(&mut self, keep: bool) {
        self.keep_approx = keep;
    }

    pub fn clamp_min(&self) -> Option<f64> {
        self.clamp_min
    }

    pub fn set_clamp_min(&mut self, value: Option<f64>) {
        self.clamp_min = value;
    }

    pub fn clamp_max(&self) -> Option<f64> {
        self.clamp_max
    }

    pub fn set_clamp_max(&mut self, value: Option<f64>) {
        self.clamp_max = value;
    }

    pub fn epsilon(&self) -> Option<f64> {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, value: Option<f64>) {
        self.epsilon = value;
    }

    /// Size of the always-retained approximation band (0 when it is not kept).
    fn num_keep(&self) -> usize {
        if self.keep_approx {
            product(&self.l[..self.dims.len()])
        } else {
            0
        }
    }

    /// The smallest capacity `compress` accepts.
    pub fn min_compression(&self) -> usize {
        if self.keep_approx {
            self.num_keep()
        } else {
            1
        }
    }

    /// Shape of the order-`level` reconstruction. Levels beyond `num_levels()`
    /// mean full resolution.
    pub fn dimension(&self, level: usize) -> Vec<usize> {
        let level = level.min(self.nlevels);
        self.wavedec.approx_dims(&self.dims, self.nlevels - level)
    }

    /// What a compressor for `dims` and `wavelet` would achieve, without building one.
    pub fn compression_info(dims: &[usize], wavelet: &str, keep_approx: bool) -> Result<CompressionInfo, WavepackError> {
        validate_dims(dims, MAX_DIMS)?;
        let wavedec = Wavedec::from_bank(FilterBank::new(wavelet, None)?);
        let nlevels = wavedec.wmaxlev(dims);
        let min = if keep_approx {
            product(&wavedec.approx_dims(dims, nlevels))
        } else {
            1
        };
        Ok(CompressionInfo {
            nlevels,
            num_lods: nlevels + 1,
            max_ratio: product(dims) / min,
        })
    }

    //==============================================================================
    // Preconditions
    //==============================================================================

    fn check_src<T: Sample>(&self, src: &[T]) -> Result<(), WavepackError> {
        self.wavedec.bank().check_sample::<T>()?;
        let expected = product(&self.dims);
        if src.len() != expected {
            return Err(WavepackError::LengthMismatch {
                expected,
                actual: src.len(),
            });
        }
        Ok(())
    }

    fn check_maps(&self, maps: &[SignificanceMap], available: usize) -> Result<(), WavepackError> {
        let mut total = 0;
        for map in maps {
            if map.dims() != [self.clen] {
                return Err(WavepackError::ShapeMismatch {
                    expected: vec![self.clen],
                    actual: map.dims().to_vec(),
                });
            }
            total += map.num_significant();
        }
        if available < total {
            return Err(WavepackError::LengthMismatch {
                expected: total,
                actual: available,
            });
        }
        Ok(())
    }

    fn check_dst<T>(&self, dst: &[T], level: usize) -> Result<usize, WavepackError> {
        let required = product(&self.dimension(level));
        if dst.len() < required {
            return Err(WavepackError::DestinationTooSmall {
                required,
                actual: dst.len(),
            });
        }
        Ok(required)
    }

    //==============================================================================
    // Single-shot
    //==============================================================================

    /// Transforms `src` and keeps `dst.len()` coefficients: the approximation band
    /// (when kept) followed by the largest details in ascending index order.
    /// `sigmap` is reshaped to the coefficient universe and receives their indices.
    pub fn compress<T: Sample>(&mut self, src: &[T], dst: &mut [T], sigmap: &mut SignificanceMap) -> Result<(), WavepackError> {
        self.check_src(src)?;
        let numkeep = self.num_keep();
        let capacity = dst.len();
        if capacity > self.clen || capacity < self.min_compression() {
            return Err(WavepackError::CapacityOutOfRange {
                requested: capacity,
                min: self.min_compression(),
                max: self.clen,
            });
        }
        let c = self.arena.view_mut::<T>(self.clen)?;
        self.wavedec.wavedec(src, &self.dims, self.nlevels, c, &mut self.l)?;
        sigmap.reshape(&[self.clen])?;
        sigmap.clear();
        rank_details(c, numkeep, &mut self.order);
        let kept = &mut self.order[..capacity - numkeep];
        kept.sort_unstable();

        let approx: Vec<usize> = (0..numkeep).collect();
        let (head, tail) = dst.split_at_mut(numkeep);
        emit(c, &approx, head, sigmap)?;
        emit(c, kept, tail, sigmap)?;

        log::debug!(
            "compress: kept {} of {} coefficients ({} approximation)",
            capacity,
            self.clen,
            numkeep
        );
        log_metric!("event" = "compress", "kept" = capacity, "coefficients" = self.clen);
        Ok(())
    }

    pub fn compress_to_vec<T: Sample>(&mut self, src: &[T], capacity: usize) -> Result<(Vec<T>, SignificanceMap), WavepackError> {
        let mut dst = vec![T::zero(); capacity];
        let mut sigmap = SignificanceMap::default();
        self.compress(src, &mut dst, &mut sigmap)?;
        Ok((dst, sigmap))
    }

    /// Rebuilds a block from the values `compress` produced. Reconstructed samples
    /// are then clamped and, when an epsilon is set, flushed to zero below it.
    pub fn decompress<T: Sample>(&mut self, src: &[T], dst: &mut [T], sigmap: &mut SignificanceMap) -> Result<(), WavepackError> {
        self.wavedec.bank().check_sample::<T>()?;
        self.check_maps(std::slice::from_ref(sigmap), src.len())?;
        let out_len = self.check_dst(dst, self.nlevels)?;

        let c = self.arena.zeroed_mut::<T>(self.clen)?;
        sigmap.next_entry_restart();
        for value in src {
            match sigmap.next_entry() {
                Some(idx) => c[idx] = *value,
                None => break,
            }
        }
        self.wavedec
            .appcoef(c, &self.l, self.nlevels, self.nlevels, false, &mut dst[..out_len])?;
        self.apply_clamp(&mut dst[..out_len]);
        if let Some(eps) = self.epsilon {
            let eps = eps.abs();
            for v in dst[..out_len].iter_mut() {
                if v.to_f64().abs() < eps {
                    *v = T::zero();
                }
            }
        }
        log::debug!("decompress: {} coefficients -> {:?}", sigmap.num_significant(), self.dims);
        Ok(())
    }

    pub fn decompress_to_vec<T: Sample>(&mut self, src: &[T], sigmap: &mut SignificanceMap) -> Result<Vec<T>, WavepackError> {
        let mut dst = vec![T::zero(); product(&self.dims)];
        self.decompress(src, &mut dst, sigmap)?;
        Ok(dst)
    }

    //==============================================================================
    // Progressive
    //==============================================================================

    /// Like `compress`, but splits the ranked coefficients into consecutive
    /// partitions of `dst_lens[j]` values, each written to `dst` in turn with its
    /// indices in `sigmaps[j]`. The approximation band (when kept) opens partition 0.
    pub fn decompose<T: Sample>(
        &mut self,
        src: &[T],
        dst: &mut [T],
        dst_lens: &[usize],
        sigmaps: &mut [SignificanceMap],
    ) -> Result<(), WavepackError> {
        self.check_src(src)?;
        if dst_lens.is_empty() || dst_lens.len() != sigmaps.len() {
            return Err(WavepackError::InvalidArgument(format!(
                "{} partition lengths for {} significance maps",
                dst_lens.len(),
                sigmaps.len()
            )));
        }
        let numkeep = self.num_keep();
        let total: usize = dst_lens.iter().sum();
        if total > self.clen || dst_lens[0] < numkeep {
            return Err(WavepackError::CapacityOutOfRange {
                requested: total,
                min: numkeep,
                max: self.clen,
            });
        }
        if dst.len() < total {
            return Err(WavepackError::DestinationTooSmall {
                required: total,
                actual: dst.len(),
            });
        }
        let c = self.arena.view_mut::<T>(self.clen)?;
        self.wavedec.wavedec(src, &self.dims, self.nlevels, c, &mut self.l)?;
        for map in sigmaps.iter_mut() {
            map.reshape(&[self.clen])?;
            map.clear();
        }
        rank_details(c, numkeep, &mut self.order);

        let approx: Vec<usize> = (0..numkeep).collect();
        let (head, mut rest) = dst.split_at_mut(numkeep);
        emit(c, &approx, head, &mut sigmaps[0])?;

        let mut ranked = &mut self.order[..total - numkeep];
        for (j, &len) in dst_lens.iter().enumerate() {
            let take = if j == 0 { len - numkeep } else { len };
            let (part, next) = std::mem::take(&mut ranked).split_at_mut(take);
            part.sort_unstable();
            let (out, after) = std::mem::take(&mut rest).split_at_mut(take);
            emit(c, part, out, &mut sigmaps[j])?;
            ranked = next;
            rest = after;
        }

        log::debug!("decompose: {} partitions, {} of {} coefficients", dst_lens.len(), total, self.clen);
        log_metric!("event" = "decompose", "partitions" = dst_lens.len(), "kept" = total);
        Ok(())
    }

    /// Rebuilds the order-`level` reconstruction (default: full resolution) from the
    /// values of any prefix of `decompose`'s partitions, consumed map by map.
    /// Partial resolutions are normalized; reconstructed samples are clamped.
    pub fn reconstruct<T: Sample>(
        &mut self,
        src: &[T],
        dst: &mut [T],
        sigmaps: &mut [SignificanceMap],
        level: Option<usize>,
    ) -> Result<(), WavepackError> {
        self.wavedec.bank().check_sample::<T>()?;
        self.check_maps(sigmaps, src.len())?;
        let level = level.unwrap_or(self.nlevels);
        let out_len = self.check_dst(dst, level)?;

        let c = self.arena.zeroed_mut::<T>(self.clen)?;
        let mut values = src.iter();
        for map in sigmaps.iter_mut() {
            map.next_entry_restart();
            while let Some(idx) = map.next_entry() {
                if let Some(v) = values.next() {
                    c[idx] = *v;
                }
            }
        }
        self.wavedec
            .appcoef(c, &self.l, self.nlevels, level, true, &mut dst[..out_len])?;
        self.apply_clamp(&mut dst[..out_len]);
        log::debug!("reconstruct: level {} of {} from {} maps", level.min(self.nlevels), self.nlevels, sigmaps.len());
        Ok(())
    }

    fn apply_clamp<T: Sample>(&self, data: &mut [T]) {
        if let Some(min) = self.clamp_min {
            for v in data.iter_mut() {
                if v.to_f64() < min {
                    *v = T::from_f64(min);
                }
            }
        }
        if let Some(max) = self.clamp_max {
            for v in data.iter_mut() {
                if v.to_f64() > max {
                    *v = T::from_f64(max);
                }
            }
        }
    }
}

impl fmt::Display for Compressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dims: {:?}", self.dims)?;
        writeln!(f, "wavelet: {} ({})", self.wavelet(), self.mode())?;
        writeln!(f, "levels: {}", self.nlevels)?;
        writeln!(f, "coefficients: {}", self.clen)?;
        writeln!(f, "bookkeeping length: {}", self.l.len())?;
        writeln!(f, "keep approximation: {}", self.keep_approx)?;
        writeln!(f, "clamp min: {:?}", self.clamp_min)?;
        writeln!(f, "clamp max: {:?}", self.clamp_max)?;
        writeln!(f, "epsilon: {:?}", self.epsilon)
    }
}

#[cfg(test)]
mod tests;
