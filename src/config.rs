// In: src/config.rs

//! Serializable configuration for the compressor and the logging backend.
//!
//! A `CompressorConfig` is usually loaded once at the application boundary (for
//! example from a JSON document) and handed to `Compressor::from_config` for every
//! block shape the application works with.

use serde::{Deserialize, Serialize};

use crate::error::WavepackError;

//==================================================================================
// I. Compressor Configuration
//==================================================================================

/// Settings that select the wavelet and the post-reconstruction filters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CompressorConfig {
    /// Wavelet family name, e.g. `"bior4.4"`, `"haar"`, `"intbior2.2"`.
    #[serde(default = "default_wavelet")]
    pub wavelet: String,

    /// Boundary mode name. `None` selects the wavelet's default mode.
    #[serde(default)]
    pub mode: Option<String>,

    /// Always retain the coarsest approximation band.
    #[serde(default = "default_true")]
    pub keep_approx: bool,

    /// Lower bound applied to reconstructed samples.
    #[serde(default)]
    pub clamp_min: Option<f64>,

    /// Upper bound applied to reconstructed samples.
    #[serde(default)]
    pub clamp_max: Option<f64>,

    /// Reconstructed samples with magnitude below `|epsilon|` are zeroed by `decompress`.
    #[serde(default)]
    pub epsilon: Option<f64>,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            wavelet: default_wavelet(),
            mode: None,
            keep_approx: true,
            clamp_min: None,
            clamp_max: None,
            epsilon: None,
        }
    }
}

impl CompressorConfig {
    /// Parses a configuration from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, WavepackError> {
        Ok(serde_json::from_str(json)?)
    }
}

//==================================================================================
// II. Logging Configuration
//==================================================================================

/// Settings for `observability::init_logging`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// A `log::LevelFilter` name (`"off"`, `"error"`, ..., `"trace"`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append log lines to this file instead of stderr.
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_json(json: &str) -> Result<Self, WavepackError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_wavelet() -> String {
    "bior4.4".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
