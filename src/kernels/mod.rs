//! This module collects the pure, stateless kernels the transforms are built from.
//!
//! None of these functions allocate beyond the scratch buffers they are handed, and
//! none validate shapes: `wavelet::dwt` and `sigmap` size every buffer before calling in.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Boundary handling
pub mod extension;

/// Real-valued filter banks
pub mod convolution;

/// Integer CDF 5/3
pub mod lifting;

/// Fixed-width bit packing
pub mod bitstream;
