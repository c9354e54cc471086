//! This file is the root of the `wavepack` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`wavelet`, `sigmap`,
//!     `compressor`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the types most callers need, so `use wavepack::Compressor`
//!     works without knowing the module layout.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod compressor;
pub mod config;
pub mod error;
pub mod kernels;
pub mod sigmap;
pub mod traits;
pub mod types;
pub mod utils;
pub mod wavelet;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use compressor::{CompressionInfo, Compressor};
pub use config::{CompressorConfig, LoggingConfig};
pub use error::{ErrorKind, WavepackError};
pub use observability::init_logging;
pub use sigmap::SignificanceMap;
pub use traits::Sample;
pub use types::SampleType;
pub use wavelet::{BoundaryMode, FilterBank, Wavedec};
