//! Wavelet filter banks and the multi-level transforms built on them.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Boundary extension modes
pub mod mode;

/// Filter coefficient tables
pub mod family;

/// Single-level filter bank
pub mod dwt;

/// The `L` vector
pub mod bookkeeping;

/// Multi-level decomposition
pub mod wavedec;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use dwt::FilterBank;
pub use family::{FamilyKind, WaveletFilter, WAVELET_NAMES};
pub use mode::BoundaryMode;
pub use wavedec::Wavedec;
