//! Platform configuration.
//!
//! YAML (`.yaml`, `.yml`) and JSON (`.json`) files are read with serde.
//! Anything else is treated as the older line format:
//!
//! ```text
//! dll_path=C:\BlueTiger\BTApi_x64.dll
//! distance_sensitivity=0.5
//! rotational_sensitivity=75.0
//! function_call_hertz=20.0
//! wheel_sensitivity=0.25
//! ```
//!
//! `wheel_sensitivity` is a steering setting and is accepted but not used.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_LIBRARY_NAME;
use crate::error::{BtError, BtResult};
use crate::feeder::FeedMode;
use crate::motion::Sensitivity;
use crate::types::Identity;

pub const DEFAULT_DISTANCE_SENSITIVITY: f32 = 0.5;
pub const MAX_DISTANCE_SENSITIVITY: f32 = 5.0;
pub const DEFAULT_ROTATIONAL_SENSITIVITY: f32 = 75.0;
pub const MAX_ROTATIONAL_SENSITIVITY: f32 = 100.0;
pub const DEFAULT_UPDATE_RATE_HZ: f32 = 20.0;

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "bluetiger.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Driver library; [`DEFAULT_LIBRARY_NAME`] in the working directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_path: Option<PathBuf>,
    pub identity: Identity,
    pub distance_sensitivity: f32,
    pub rotational_sensitivity: f32,
    pub update_rate_hz: f32,
    pub feed_mode: FeedMode,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            identity: Identity::default(),
            distance_sensitivity: DEFAULT_DISTANCE_SENSITIVITY,
            rotational_sensitivity: DEFAULT_ROTATIONAL_SENSITIVITY,
            update_rate_hz: DEFAULT_UPDATE_RATE_HZ,
            feed_mode: FeedMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
    Legacy,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Format::Yaml,
            Some("json") => Format::Json,
            _ => Format::Legacy,
        }
    }
}

impl PlatformConfig {
    /// Read and sanitize the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> BtResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = match Format::of(path) {
            Format::Yaml => Self::from_yaml_str(&text)?,
            Format::Json => serde_json::from_str(&text)?,
            Format::Legacy => Self::from_legacy_str(&text),
        };
        config.sanitize();
        tracing::debug!(path = %path.display(), "loaded platform configuration");
        Ok(config)
    }

    /// Like [`PlatformConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> BtResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(
                path = %path.display(),
                "configuration file not found, continuing with default values"
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_yaml_str(text: &str) -> BtResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse the `key=value` line format. Unknown keys are ignored and
    /// unparsable numbers keep their defaults.
    pub fn from_legacy_str(text: &str) -> Self {
        let mut config = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "dll_path" | "library_path" => config.library_path = Some(PathBuf::from(value)),
                "distance_sensitivity" => {
                    config.distance_sensitivity =
                        parse_number(key, value, DEFAULT_DISTANCE_SENSITIVITY)
                }
                "rotational_sensitivity" => {
                    config.rotational_sensitivity =
                        parse_number(key, value, DEFAULT_ROTATIONAL_SENSITIVITY)
                }
                "function_call_hertz" | "update_rate_hz" => {
                    config.update_rate_hz = parse_number(key, value, DEFAULT_UPDATE_RATE_HZ)
                }
                "wheel_sensitivity" => {
                    tracing::debug!(key, "steering setting is not used by the motion feed")
                }
                "feed_mode" => match value {
                    "acceleration" => config.feed_mode = FeedMode::Acceleration,
                    "pitch_roll" => config.feed_mode = FeedMode::PitchRoll,
                    "rotation_vector" => config.feed_mode = FeedMode::RotationVector,
                    other => tracing::warn!(value = other, "unknown feed_mode, using acceleration"),
                },
                other => tracing::debug!(key = other, "ignoring unknown configuration key"),
            }
        }
        config
    }

    /// Replace out-of-range values with their defaults.
    pub fn sanitize(&mut self) {
        sanitize_field(
            "distance_sensitivity",
            &mut self.distance_sensitivity,
            DEFAULT_DISTANCE_SENSITIVITY,
            Some(MAX_DISTANCE_SENSITIVITY),
        );
        sanitize_field(
            "rotational_sensitivity",
            &mut self.rotational_sensitivity,
            DEFAULT_ROTATIONAL_SENSITIVITY,
            Some(MAX_ROTATIONAL_SENSITIVITY),
        );
        sanitize_field(
            "update_rate_hz",
            &mut self.update_rate_hz,
            DEFAULT_UPDATE_RATE_HZ,
            None,
        );
    }

    /// Reject what [`PlatformConfig::sanitize`] cannot repair.
    pub fn validate(&self) -> BtResult<()> {
        self.identity
            .validate()
            .map_err(|e| BtError::Config(format!("identity: {e}")))?;
        if let Some(path) = &self.library_path
            && path.as_os_str().is_empty()
        {
            return Err(BtError::Config("library_path is empty".to_string()));
        }
        Ok(())
    }

    pub fn resolved_library_path(&self) -> PathBuf {
        match &self.library_path {
            Some(path) => path.clone(),
            None => std::env::current_dir()
                .unwrap_or_default()
                .join(DEFAULT_LIBRARY_NAME),
        }
    }

    pub fn sensitivity(&self) -> Sensitivity {
        Sensitivity {
            distance: self.distance_sensitivity,
            rotational: self.rotational_sensitivity,
        }
    }

    pub fn to_yaml(&self) -> BtResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn parse_number(key: &str, value: &str, default: f32) -> f32 {
    match value.parse::<f32>() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(
                key,
                value,
                default,
                "configuration value is not a number, using default"
            );
            default
        }
    }
}

fn sanitize_field(name: &'static str, value: &mut f32, default: f32, max: Option<f32>) {
    let too_high = max.is_some_and(|m| *value > m);
    if !value.is_finite() || *value <= 0.0 || too_high {
        tracing::warn!(
            field = name,
            value = *value,
            default,
            max,
            "configuration value out of range, using default"
        );
        *value = default;
    }
}
