// In: src/error.rs

//! This module defines the single, unified error type for the entire wavepack library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every variant belongs to one of three categories reported by [`WavepackError::kind`]:
//! configuration errors are fatal to the object being built, precondition errors are
//! recoverable by the caller, and corrupt-data errors reject a foreign buffer.

use thiserror::Error;

use crate::types::SampleType;

/// The broad category an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Precondition,
    CorruptData,
}

#[derive(Error, Debug)]
pub enum WavepackError {
    // =========================================================================
    // === Configuration Errors
    // =========================================================================
    #[error("Unknown wavelet: '{0}'")]
    UnknownWavelet(String),

    #[error("Unknown boundary mode: '{0}'")]
    UnknownMode(String),

    #[error("Wavelet '{wavelet}' is not invertible under boundary mode '{mode}'")]
    InvalidPairing { wavelet: String, mode: String },

    #[error("Wavelet '{wavelet}' cannot transform {sample_type} samples")]
    UnsupportedSampleType {
        wavelet: String,
        sample_type: SampleType,
    },

    #[error("Invalid shape {dims:?}: expected 1 to {max_dims} dimensions, each at least 1")]
    InvalidShape { dims: Vec<usize>, max_dims: usize },

    #[error("Unknown log level: '{0}'")]
    InvalidLogLevel(String),

    // =========================================================================
    // === Precondition Errors
    // =========================================================================
    #[error("Invalid number of transforms: {requested} (maximum for this shape is {max})")]
    LevelOutOfRange { requested: usize, max: usize },

    #[error("Signal of length {len} is shorter than the filter length {filter_len}")]
    SignalTooShort { len: usize, filter_len: usize },

    #[error("Buffer length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Destination too small: {required} elements required, {actual} available")]
    DestinationTooSmall { required: usize, actual: usize },

    #[error("Requested {requested} coefficients, valid range is {min}..={max}")]
    CapacityOutOfRange {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("Bookkeeping vector has length {actual}, expected {expected}")]
    BookkeepingMismatch { expected: usize, actual: usize },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Index {index} out of range for a universe of {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Coordinates {coords:?} out of range for dims {dims:?}")]
    CoordinatesOutOfRange {
        coords: Vec<usize>,
        dims: Vec<usize>,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Integer transform of this signal overflows {sample_type} coefficients")]
    CoefficientOverflow { sample_type: SampleType },

    // =========================================================================
    // === Corrupt Data Errors
    // =========================================================================
    #[error("Significance map has a bad magic number")]
    BadMagic,

    #[error("Unsupported significance map version: {0}")]
    UnsupportedVersion(u8),

    #[error("Significance map truncated: {required} bytes required, {actual} available")]
    TruncatedMap { required: usize, actual: usize },

    #[error("Significance map header is corrupt: {0}")]
    CorruptHeader(String),

    #[error("Decoded index {index} exceeds universe size {size}")]
    CorruptIndex { index: u64, size: u64 },

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g. opening a log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a configuration.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // Manual `From` impl is needed as bytemuck::PodCastError doesn't impl Error
}

impl WavepackError {
    /// Classifies this error into one of the three categories.
    pub fn kind(&self) -> ErrorKind {
        use WavepackError::*;
        match self {
            UnknownWavelet(_)
            | UnknownMode(_)
            | InvalidPairing { .. }
            | UnsupportedSampleType { .. }
            | InvalidShape { .. }
            | InvalidLogLevel(_)
            | Io(_)
            | SerdeJson(_) => ErrorKind::Configuration,
            BadMagic
            | UnsupportedVersion(_)
            | TruncatedMap { .. }
            | CorruptHeader(_)
            | CorruptIndex { .. } => ErrorKind::CorruptData,
            _ => ErrorKind::Precondition,
        }
    }
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for WavepackError {
    fn from(err: bytemuck::PodCastError) -> Self {
        WavepackError::PodCast(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            WavepackError::UnknownWavelet("db99".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            WavepackError::LevelOutOfRange { requested: 9, max: 3 }.kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            WavepackError::CoefficientOverflow { sample_type: SampleType::Int32 }.kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            WavepackError::InvalidLogLevel("loud".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(WavepackError::BadMagic.kind(), ErrorKind::CorruptData);
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(WavepackError::from(json_err).kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_error_messages_carry_values() {
        let err = WavepackError::DestinationTooSmall {
            required: 64,
            actual: 10,
        };
        assert_eq!(
            err.to_string(),
            "Destination too small: 64 elements required, 10 available"
        );
    }
}
