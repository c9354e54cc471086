// In: src/compressor/info.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a compressor built for a given shape and wavelet can achieve.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionInfo {
    /// Decomposition depth.
    pub nlevels: usize,
    /// Number of reconstruction resolutions (`nlevels + 1`).
    pub num_lods: usize,
    /// Samples per retained coefficient at the smallest allowed capacity.
    pub max_ratio: usize,
}

impl fmt::Display for CompressionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "levels: {}, lods: {}, max ratio: {}:1",
            self.nlevels, self.num_lods, self.max_ratio
        )
    }
}
