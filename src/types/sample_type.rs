//! This module defines the canonical, type-safe representation of the element
//! types a wavelet transform can operate on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical, internal representation of a sample element type.
///
/// Float samples are transformed with real-valued filter banks; integer samples
/// are transformed with the integer lifting scheme.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    Float32,
    Float64,
    Int32,
    Int64,
}

impl SampleType {
    /// Returns `true` if the sample type is an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }

    /// Width of one sample in bytes.
    pub fn byte_width(&self) -> usize {
        match self {
            Self::Float32 | Self::Int32 => 4,
            Self::Float64 | Self::Int64 => 8,
        }
    }
}

/// Provides the canonical string representation for a `SampleType`.
impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // These string representations appear in error messages and logs.
        let name = match self {
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_predicates() {
        assert_eq!(SampleType::Float32.to_string(), "float32");
        assert_eq!(SampleType::Int64.to_string(), "int64");
        assert!(SampleType::Int32.is_integer());
        assert!(!SampleType::Float32.is_integer());
        assert_eq!(SampleType::Float64.byte_width(), 8);
        assert_eq!(SampleType::Int32.byte_width(), std::mem::size_of::<i32>());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&SampleType::Float64).unwrap();
        assert_eq!(json, "\"float64\"");
        let back: SampleType = serde_json::from_str("\"int32\"").unwrap();
        assert_eq!(back, SampleType::Int32);
    }
}
