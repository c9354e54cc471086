// In: src/observability.rs

//! This module provides observability and diagnostics for the transforms and the compressor.
//!
//! Two tools live here:
//! 1.  The `log_metric!` macro, which prints structured key-value lines to stdout in
//!     debug builds and compiles to nothing in release builds.
//! 2.  `init_logging`, which installs an `env_logger` backend for the `log` facade
//!     once per process.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Once;

use crate::config::LoggingConfig;
use crate::error::WavepackError;

/// Logs a structured key-value metric string to stdout, only in debug builds.
///
/// # Example
/// ```
/// use wavepack::log_metric;
/// let kept = 128;
/// log_metric!("event"="compress", "kept"=&kept);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            let output = format!("WAVEPACK_METRIC: {{ {} }}", parts.join(", "));
            println!("{}", output);
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs the process-wide logger described by `config`.
///
/// Only the first successful call has an effect; later calls return `Ok(())`.
/// Fails on an unknown level name or if the configured log file cannot be opened.
pub fn init_logging(config: &LoggingConfig) -> Result<(), WavepackError> {
    let level: LevelFilter = config
        .level
        .parse()
        .map_err(|_| WavepackError::InvalidLogLevel(config.level.clone()))?;

    // Open the file before entering the Once so the error can be reported.
    let file = match &config.file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
