// In: src/wavelet/mode.rs

//! Boundary extension modes.
//!
//! A mode decides how a finite signal is continued past its ends before it is
//! convolved. Names follow the usual wavelet-toolbox spelling and parse from
//! either all-lowercase or all-uppercase text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WavepackError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Zero padding.
    Zpd,
    /// Half-point symmetric: the edge sample is repeated.
    Symh,
    /// Whole-point symmetric: mirrored about the edge sample.
    Symw,
    /// Half-point antisymmetric.
    Asymh,
    /// Whole-point antisymmetric.
    Asymw,
    /// Constant continuation of the edge sample.
    Sp0,
    /// Linear continuation through the two edge samples.
    Sp1,
    /// Periodic padding.
    Ppd,
    /// Circular transform: output bands have exactly half the (even-padded) input length.
    Per,
}

impl BoundaryMode {
    pub const ALL: [BoundaryMode; 9] = [
        Self::Zpd,
        Self::Symh,
        Self::Symw,
        Self::Asymh,
        Self::Asymw,
        Self::Sp0,
        Self::Sp1,
        Self::Ppd,
        Self::Per,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zpd => "zpd",
            Self::Symh => "symh",
            Self::Symw => "symw",
            Self::Asymh => "asymh",
            Self::Asymw => "asymw",
            Self::Sp0 => "sp0",
            Self::Sp1 => "sp1",
            Self::Ppd => "ppd",
            Self::Per => "per",
        }
    }
}

impl FromStr for BoundaryMode {
    type Err = WavepackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Mixed case ("SymH") is not a recognised spelling.
        let lowered = if s.chars().all(|c| !c.is_ascii_lowercase()) {
            s.to_ascii_lowercase()
        } else {
            s.to_string()
        };
        match lowered.as_str() {
            "zpd" => Ok(Self::Zpd),
            "symh" => Ok(Self::Symh),
            "symw" => Ok(Self::Symw),
            "asymh" => Ok(Self::Asymh),
            "asymw" => Ok(Self::Asymw),
            "sp0" => Ok(Self::Sp0),
            "sp1" | "spd" => Ok(Self::Sp1),
            "ppd" => Ok(Self::Ppd),
            "per" => Ok(Self::Per),
            _ => Err(WavepackError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
