//! This module defines shared traits used across the transforms and the compressor.
//!
//! `Sample` is the element type a caller hands in (`f32`, `f64`, `i32`, `i64`).
//! Every sample maps onto a `KernelScalar` (`f64` or `i64`) that the single-level
//! kernels compute in, so a filter bank only ever needs two arithmetic paths.

use num_traits::{NumCast, Zero};
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::error::WavepackError;
use crate::types::SampleType;
use crate::wavelet::dwt::LevelTransform;

/// Arithmetic scalar the kernels operate on.
pub trait KernelScalar:
    Copy
    + Default
    + Debug
    + PartialEq
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + Send
    + Sync
    + 'static
{
    fn from_usize(v: usize) -> Self;
}

impl KernelScalar for f64 {
    #[inline]
    fn from_usize(v: usize) -> Self {
        v as f64
    }
}

impl KernelScalar for i64 {
    #[inline]
    fn from_usize(v: usize) -> Self {
        v as i64
    }
}

/// An element type that can be decomposed, ranked and reconstructed.
pub trait Sample:
    bytemuck::Pod + Default + PartialOrd + Debug + Display + NumCast + Zero + Send + Sync + 'static
{
    const SAMPLE_TYPE: SampleType;

    type Kernel: LevelTransform;

    fn to_kernel(self) -> Self::Kernel;
    /// Narrows a kernel value back to `Self`; `None` when an integer does not fit.
    fn try_from_kernel(k: Self::Kernel) -> Option<Self>;

    /// `try_from_kernel`, reporting a value that does not fit as `CoefficientOverflow`.
    fn from_kernel(k: Self::Kernel) -> Result<Self, WavepackError> {
        Self::try_from_kernel(k).ok_or(WavepackError::CoefficientOverflow {
            sample_type: Self::SAMPLE_TYPE,
        })
    }

    fn to_f64(self) -> f64;
    /// Converts back from `f64`, truncating toward zero for integer types.
    fn from_f64(v: f64) -> Self;

    /// Orders two samples by absolute value.
    fn magnitude_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_float_sample {
    ($T:ty, $variant:ident) => {
        impl Sample for $T {
            const SAMPLE_TYPE: SampleType = SampleType::$variant;
            type Kernel = f64;

            #[inline]
            fn to_kernel(self) -> f64 {
                self as f64
            }
            #[inline]
            fn try_from_kernel(k: f64) -> Option<Self> {
                Some(k as $T)
            }
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $T
            }
            #[inline]
            fn magnitude_cmp(&self, other: &Self) -> Ordering {
                self.abs().total_cmp(&other.abs())
            }
        }
    };
}

macro_rules! impl_int_sample {
    ($T:ty, $variant:ident) => {
        impl Sample for $T {
            const SAMPLE_TYPE: SampleType = SampleType::$variant;
            type Kernel = i64;

            #[inline]
            fn to_kernel(self) -> i64 {
                self as i64
            }
            #[inline]
            fn try_from_kernel(k: i64) -> Option<Self> {
                <$T as NumCast>::from(k)
            }
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $T
            }
            #[inline]
            fn magnitude_cmp(&self, other: &Self) -> Ordering {
                self.unsigned_abs().cmp(&other.unsigned_abs())
            }
        }
    };
}

impl_float_sample!(f32, Float32);
impl_float_sample!(f64, Float64);
impl_int_sample!(i32, Int32);
impl_int_sample!(i64, Int64);
