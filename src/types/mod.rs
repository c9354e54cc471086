//! This module defines the core, strongly-typed data representations used
//! throughout wavepack.
//!
//! It currently includes the canonical `SampleType` enum naming the element
//! types the transforms accept.

pub mod sample_type;

// Re-export the main type(s) for easier access.
pub use sample_type::SampleType;
