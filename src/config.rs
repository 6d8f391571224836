//! Pipeline configuration.
//!
//! Handles loading, validating and merging `shotprep.toml`. Configuration is
//! read once at startup: stock defaults are overridden by whatever the user
//! file sets, and the result is fixed for the life of the process.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [budget]
//! max_dimension = 2048          # Longer side of a prepared image, in pixels
//! max_bytes = 10485760          # Size of a prepared image, in bytes (10 MiB)
//!
//! [admission]
//! max_original_bytes = 52428800 # Originals above this are refused before decoding (50 MiB)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [budget]
//! max_dimension = 1536
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::EncodeBudget;
use crate::validate::AdmissionLimits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name looked up by the CLI.
pub const CONFIG_FILENAME: &str = "shotprep.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `shotprep.toml`.
///
/// All fields have defaults matching the upload contract. User config files
/// need only specify the values they want to override. Unknown keys are
/// rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrepConfig {
    /// Size and dimension contract for prepared images.
    pub budget: EncodeBudget,
    /// Pre-decode admission limits for originals.
    pub admission: AdmissionLimits,
}

impl PrepConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.budget.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "budget.max_dimension must be non-zero".into(),
            ));
        }
        if self.budget.max_bytes == 0 {
            return Err(ConfigError::Validation(
                "budget.max_bytes must be non-zero".into(),
            ));
        }
        if self.admission.max_original_bytes < self.budget.max_bytes {
            return Err(ConfigError::Validation(
                "admission.max_original_bytes must be at least budget.max_bytes".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(PrepConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PrepConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PrepConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// A missing file yields the stock defaults. User values are merged on top
/// of the defaults, unknown keys are rejected, and the result is validated.
pub fn load_config(path: &Path) -> Result<PrepConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `shotprep.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# shotprep Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The file is read once at startup. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output budget
# ---------------------------------------------------------------------------
[budget]
# Longer side of a prepared image, in pixels. Larger images are scaled down
# with their aspect ratio preserved.
max_dimension = 2048

# Size ceiling for a prepared image, in bytes (10 MiB).
# JPEG output is retried once at lower quality before giving up.
# PNG output is never recompressed lossily.
max_bytes = 10485760

# ---------------------------------------------------------------------------
# Admission
# ---------------------------------------------------------------------------
[admission]
# Originals larger than this are refused before any decoding (50 MiB).
# Must be at least budget.max_bytes.
max_original_bytes = 52428800
"##
}
