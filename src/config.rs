//! Configuration loading, merging, and validation.
//!
//! Configuration is built once at startup and passed down as an immutable
//! [`Config`]. Nothing below `main` reads the environment.
//!
//! ## Layers
//!
//! ```text
//! stock defaults  →  pagecast.toml (sparse, optional)  →  PAGECAST_* environment
//! ```
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! archive_root = "archive"    # series/volume/page directory tree
//! cursor_path = "cursor.json" # where the next index is persisted
//! outbox = "outbox"           # where posts are handed off
//!
//! [catalog]
//! series = []                 # display name per series, in on-disk order
//!
//! [encoder]
//! quality = 89                # starting JPEG quality (1-100)
//! resize_step = 0.04          # scale decrement per attempt (0 < step < 1)
//! byte_budget = 1000000       # upload size limit in bytes
//! ```
//!
//! ## Environment
//!
//! | Variable | Overrides |
//! |---|---|
//! | `PAGECAST_QUALITY` | `encoder.quality` |
//! | `PAGECAST_RESIZE_STEP` | `encoder.resize_step` |
//! | `PAGECAST_BYTE_BUDGET` | `encoder.byte_budget` |
//!
//! A set but unparseable variable is an error, not a silent default.
//! Unknown keys in the file are rejected to catch typos early.

use crate::catalog::SeriesCatalog;
use crate::imaging::{DegradeSchedule, FitConfig, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_QUALITY: &str = "PAGECAST_QUALITY";
pub const ENV_RESIZE_STEP: &str = "PAGECAST_RESIZE_STEP";
pub const ENV_BYTE_BUDGET: &str = "PAGECAST_BYTE_BUDGET";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full configuration. All fields have defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the series/volume/page tree.
    pub archive_root: PathBuf,
    /// Persisted cursor record.
    pub cursor_path: PathBuf,
    /// Directory the outbox publisher writes into.
    pub outbox: PathBuf,
    pub catalog: CatalogConfig,
    pub encoder: EncoderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_root: PathBuf::from("archive"),
            cursor_path: PathBuf::from("cursor.json"),
            outbox: PathBuf::from("outbox"),
            catalog: CatalogConfig::default(),
            encoder: EncoderConfig::default(),
        }
    }
}

/// Series display names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub series: SeriesCatalog,
}

/// Size-constrained encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    /// Starting JPEG quality (1-100).
    pub quality: u32,
    /// Scale factor decrement per attempt.
    pub resize_step: f64,
    /// Largest acceptable encoded size, in bytes.
    pub byte_budget: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            quality: 89,
            resize_step: 0.04,
            byte_budget: 1_000_000,
        }
    }
}

impl EncoderConfig {
    pub fn fit_config(&self) -> FitConfig {
        FitConfig {
            byte_budget: self.byte_budget,
            schedule: DegradeSchedule::new(Quality::new(self.quality), self.resize_step),
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.encoder.quality) {
            return Err(ConfigError::Validation(
                "encoder.quality must be 1-100".into(),
            ));
        }
        if !(self.encoder.resize_step > 0.0 && self.encoder.resize_step < 1.0) {
            return Err(ConfigError::Validation(
                "encoder.resize_step must be greater than 0 and less than 1".into(),
            ));
        }
        if self.encoder.byte_budget == 0 {
            return Err(ConfigError::Validation(
                "encoder.byte_budget must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Apply `PAGECAST_*` overrides read through `lookup`, then re-validate.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production and a map in tests.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Config, ConfigError> {
        if let Some(quality) = env_parse(&lookup, ENV_QUALITY)? {
            self.encoder.quality = quality;
        }
        if let Some(step) = env_parse(&lookup, ENV_RESIZE_STEP)? {
            self.encoder.resize_step = step;
        }
        if let Some(budget) = env_parse(&lookup, ENV_BYTE_BUDGET)? {
            self.encoder.byte_budget = budget;
        }
        self.validate()?;
        Ok(self)
    }

    /// Resolve relative paths against `base` (the config file's directory).
    pub fn rebase(mut self, base: &Path) -> Config {
        for path in [
            &mut self.archive_root,
            &mut self.cursor_path,
            &mut self.outbox,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}

fn env_parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
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

/// Load the config file at `path` over stock defaults.
///
/// A missing file yields the defaults. Relative paths inside the file are
/// resolved against the file's directory. Environment overrides are not
/// applied here; see [`Config::with_env`].
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let base = stock_defaults_value();
    if !path.exists() {
        let config: Config = base.try_into()?;
        return Ok(config);
    }
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    let config: Config = merge_toml(base, overlay).try_into()?;
    config.validate()?;
    let dir = path.parent().unwrap_or(Path::new(""));
    Ok(config.rebase(dir))
}

/// Returns a fully-commented stock `pagecast.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pagecast configuration
# ======================
#
# Every key is optional; the values below are the defaults.
# Relative paths are resolved against the directory of this file.

# Root of the archive: <archive_root>/<series>/<volume>/<page>.
# Order at every level is the byte-wise sort of the names, so zero-pad
# numbers (vol-02, not vol-2). `pagecast check` reports names that break this.
archive_root = "archive"

# The cursor record: {"series": S, "volume": V, "page": P}, zero-based.
# Create it with `pagecast set 0 0 0`; runs refuse to start without it.
cursor_path = "cursor.json"

# Directory the outbox publisher writes each post (image + .json) into.
outbox = "outbox"

[catalog]
# Display name for each series directory, in on-disk order.
# Must list exactly as many names as there are series directories.
series = []

[encoder]
# Pages larger than byte_budget are re-encoded as JPEG: first shrinking the
# resolution (scale 0.9, then down by resize_step until 0.2), then lowering
# quality by 4 down to 50.
# Environment overrides: PAGECAST_QUALITY, PAGECAST_RESIZE_STEP,
# PAGECAST_BYTE_BUDGET.
quality = 89
resize_step = 0.04
byte_budget = 1000000
"##
}
