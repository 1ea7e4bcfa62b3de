//! Configuration constants and types for pixelveil.

use std::path::PathBuf;

/// Default output image path when none is given.
pub const DEFAULT_OUTPUT_PATH: &str = "./output.png";

/// Number of channels per pixel in the working buffer (RGBA).
pub const CHANNELS: usize = 4;

/// Parameters of the AES-256-CBC cipher.
pub mod cipher_params {
    /// Key length in bytes (SHA-256 output).
    pub const KEY_LENGTH: usize = 32;

    /// Initialization vector length in bytes.
    pub const IV_LENGTH: usize = 16;

    /// AES block size in bytes.
    pub const BLOCK_SIZE: usize = 16;

    /// Separator between the hex IV and hex ciphertext on the wire.
    pub const WIRE_SEPARATOR: char = ':';

    /// Passphrase text used when no key is supplied.
    pub const MISSING_KEY_TEXT: &str = "undefined";
}

/// Geometry of the embedded header and payload.
pub mod layout_params {
    /// First slot that carries data; slot 0 only anchors comparisons.
    pub const FIRST_SLOT: usize = 1;

    /// Stride between header slots.
    pub const HEADER_STRIDE: usize = 2;

    /// Slots reserved beyond the header bits: the header delimiter and the
    /// payload terminator.
    pub const FRAMING_OVERHEAD: usize = 2;

    /// Smallest payload spacing that can be told apart from the header stride.
    pub const MIN_SPACING: usize = 3;

    /// A written value above this is reflected below its predecessor instead.
    pub const WRAP_THRESHOLD: u16 = 250;

    /// Delta written for a `1` bit.
    pub const DELTA_ONE: u16 = 1;

    /// Delta written for a `0` bit.
    pub const DELTA_ZERO: u16 = 2;

    /// Upper bound on capacity planner iterations.
    pub const MAX_PLANNER_ITERATIONS: usize = 64;
}

/// Runtime configuration for the command-line front end.
#[derive(Debug, Clone)]
pub struct StegoConfig {
    /// Where `encrypt` writes its image when no output is given.
    pub default_output: PathBuf,

    /// Log verbosity (0 = warn, 1 = info, 2+ = debug).
    pub verbosity: u8,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            default_output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            verbosity: 0,
        }
    }
}

impl StegoConfig {
    /// Create a configuration with a custom verbosity.
    pub fn new(verbosity: u8) -> Self {
        Self {
            verbosity,
            ..Self::default()
        }
    }

    /// Resolve the output path, falling back to the default.
    pub fn output_path(&self, requested: Option<PathBuf>) -> PathBuf {
        requested.unwrap_or_else(|| self.default_output.clone())
    }

    /// Maximum log level implied by the verbosity.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_output.as_os_str().is_empty() {
            return Err("Default output path must not be empty".to_string());
        }
        if self.default_output.extension().is_none() {
            return Err(format!(
                "Default output path {} has no extension to pick an image format",
                self.default_output.display()
            ));
        }
        Ok(())
    }
}
