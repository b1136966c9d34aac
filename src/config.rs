//! Library configuration module.
//!
//! Handles loading, validating, and merging `mediakit.toml`. Every value has a
//! stock default; a config file only needs the keys it overrides. The stock
//! defaults are serialized to a TOML table, the user file is merged on top, and
//! the result is deserialized with unknown keys rejected.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [policy]
//! allowed_types_sync_version = "3.9.0"     # Jetpack version that syncs allowed_file_types
//! videopress_size_exempt_version = "4.0.0" # Jetpack version where VideoPress lifts the size cap
//! videopress_module = "videopress"
//!
//! [proxy]
//! host_suffix = "wp.com"    # Proxy hosts are i0.wp.com, i1.wp.com, ...
//! shard_count = 3
//!
//! [thumbnails.thumbnail]
//! width = 150
//! height = 150
//!
//! [thumbnails.medium]
//! width = 300
//! height = 300
//!
//! [thumbnails.large]
//! width = 1024
//! height = 1024
//!
//! [gallery]
//! default_type = "default"
//! default_size = "thumbnail"
//! ```
//!
//! The version thresholds mirror when connected sites started syncing the
//! relevant options. They are configuration rather than code because the
//! cut-over points are observed policy, not derivable from the data.

use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "mediakit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `mediakit.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// Upload policy thresholds.
    pub policy: PolicyConfig,
    /// Image proxy naming.
    pub proxy: ProxyConfig,
    /// Fallback dimensions per named image size.
    pub thumbnails: BTreeMap<String, SizeConfig>,
    /// Gallery shortcode defaults.
    pub gallery: GalleryConfig,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            proxy: ProxyConfig::default(),
            thumbnails: default_thumbnail_sizes(),
            gallery: GalleryConfig::default(),
        }
    }
}

impl MediaConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.proxy.shard_count == 0 {
            return Err(ConfigError::Validation(
                "proxy.shard_count must be non-zero".into(),
            ));
        }
        if self.proxy.host_suffix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "proxy.host_suffix must not be empty".into(),
            ));
        }
        if self.policy.videopress_module.trim().is_empty() {
            return Err(ConfigError::Validation(
                "policy.videopress_module must not be empty".into(),
            ));
        }
        if self.gallery.default_type.trim().is_empty() {
            return Err(ConfigError::Validation(
                "gallery.default_type must not be empty".into(),
            ));
        }
        for (name, size) in &self.thumbnails {
            if size.width == 0 || size.height == 0 {
                return Err(ConfigError::Validation(format!(
                    "thumbnails.{name} dimensions must be non-zero"
                )));
            }
        }
        Ok(())
    }
}

/// Version gates for connected (Jetpack) sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// Sites older than this do not report `allowed_file_types`; every type is allowed.
    pub allowed_types_sync_version: Version,
    /// From this version, sites with the VideoPress module skip the max upload size for video.
    pub videopress_size_exempt_version: Version,
    /// Module name that enables the VideoPress exemption.
    pub videopress_module: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allowed_types_sync_version: Version::new(&[3, 9, 0]),
            videopress_size_exempt_version: Version::new(&[4, 0, 0]),
            videopress_module: "videopress".to_string(),
        }
    }
}

/// Naming convention of the external image proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    /// Domain the numbered proxy hosts live under.
    pub host_suffix: String,
    /// Number of `iN` hosts to spread requests over.
    pub shard_count: u32,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host_suffix: "wp.com".to_string(),
            shard_count: 3,
        }
    }
}

/// Width and height of a named image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeConfig {
    pub width: u32,
    pub height: u32,
}

pub fn default_thumbnail_sizes() -> BTreeMap<String, SizeConfig> {
    [
        ("thumbnail", 150, 150),
        ("medium", 300, 300),
        ("large", 1024, 1024),
    ]
    .into_iter()
    .map(|(name, width, height)| (name.to_string(), SizeConfig { width, height }))
    .collect()
}

/// Defaults the gallery shortcode omits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Layout name WordPress renders when no `type` attribute is present.
    pub default_type: String,
    /// Image size used when no `size` attribute is present.
    pub default_size: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            default_type: "default".to_string(),
            default_size: "thumbnail".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(MediaConfig::default()).expect("default config must serialize")
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

/// Load `mediakit.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<MediaConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: MediaConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `mediakit.toml` in the given directory, on top of stock defaults.
pub fn load_config(dir: &Path) -> Result<MediaConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `mediakit.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# mediakit configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Upload policy for connected (Jetpack) sites
# ---------------------------------------------------------------------------
[policy]
# Sites below this version do not sync allowed_file_types, so every file
# type is treated as allowed.
allowed_types_sync_version = "3.9.0"

# From this version, video uploads to sites with the VideoPress module
# active are not checked against max_upload_size.
videopress_size_exempt_version = "4.0.0"
videopress_module = "videopress"

# ---------------------------------------------------------------------------
# Image proxy
# ---------------------------------------------------------------------------
[proxy]
# Proxied URLs take the form https://i<N>.<host_suffix>/<host>/<path>.
host_suffix = "wp.com"
# Number of numbered hosts; N is picked deterministically per image.
shard_count = 3

# ---------------------------------------------------------------------------
# Fallback dimensions for named image sizes, used when the site does not
# report image_<name>_width / image_<name>_height.
# ---------------------------------------------------------------------------
[thumbnails.large]
width = 1024
height = 1024

[thumbnails.medium]
width = 300
height = 300

[thumbnails.thumbnail]
width = 150
height = 150

# ---------------------------------------------------------------------------
# Gallery shortcode
# ---------------------------------------------------------------------------
[gallery]
# Layout rendered when the shortcode carries no type attribute. Galleries of
# this type also never carry a columns attribute.
default_type = "default"
# Image size rendered when the shortcode carries no size attribute.
default_size = "thumbnail"
"##
}
