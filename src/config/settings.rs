//! Configuration settings for casfile
//!
//! Defines the writer and hashing options together with their defaults.
//! Settings can be persisted to and loaded from JSON.

use crate::error::{CasError, IoResultExt, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Suffix appended to the final path to name the temp file
pub const DEFAULT_SUFFIX: &str = "-temp";

/// Buffer size used when hashing or copying whole files
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Permission bits for created content files (unix only)
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Permission bits for created parent directories (unix only)
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Hash algorithm behind content identifiers.
///
/// The identifier namespace depends on this choice, so a different
/// algorithm must be added as a new variant rather than swapped in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
}

impl HashAlgorithm {
    /// Get the output size in bytes
    pub fn output_size(&self) -> usize {
        match self {
            Self::Sha256 => 32,
        }
    }

    /// Length of the lowercase hex encoding
    pub fn hex_len(&self) -> usize {
        self.output_size() * 2
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
        }
    }
}

/// Options for [`AtomicWriter`](crate::fs::AtomicWriter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Suffix appended to the final path for the temp file
    pub temp_suffix: String,
    /// fsync the temp file before it is renamed into place
    pub sync_on_commit: bool,
    /// Mode for created files
    pub file_mode: u32,
    /// Mode for created parent directories
    pub dir_mode: u32,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            temp_suffix: DEFAULT_SUFFIX.to_string(),
            sync_on_commit: true,
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
        }
    }
}

impl WriterConfig {
    /// Default options with a custom temp suffix
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            temp_suffix: suffix.into(),
            ..Default::default()
        }
    }

    /// Check that the options describe a usable temp sibling
    pub fn validate(&self) -> Result<()> {
        if self.temp_suffix.is_empty() {
            return Err(CasError::config("temp suffix must not be empty"));
        }
        if self.temp_suffix.contains('/') || self.temp_suffix.contains(std::path::MAIN_SEPARATOR) {
            return Err(CasError::config(format!(
                "temp suffix must not contain a path separator: {:?}",
                self.temp_suffix
            )));
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasConfig {
    /// Atomic writer options
    pub writer: WriterConfig,
    /// Buffer size in bytes for whole-file hashing and copying
    pub buffer_size: usize,
}

impl Default for CasConfig {
    fn default() -> Self {
        Self {
            writer: WriterConfig::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl CasConfig {
    /// Validate all settings
    pub fn validate(&self) -> Result<()> {
        self.writer.validate()?;
        if self.buffer_size == 0 {
            return Err(CasError::config("buffer size must be greater than zero"));
        }
        Ok(())
    }

    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).with_path(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_path(path)?;
        Ok(())
    }
}
