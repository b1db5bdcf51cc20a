use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::shield::{ShieldPolicy, DEFAULT_RETENTION};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    pub station: StationConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub visibility: VisibilityConfig,
    #[serde(default)]
    pub shields: ShieldsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

/// Fixed observer used for pass predictions when a request names none.
#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    pub catalog_file: Option<PathBuf>,
    pub tle_folder: Option<PathBuf>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub refresh_interval: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisibilityConfig {
    /// Objects must be strictly above this elevation.
    #[serde(default)]
    pub min_elevation_deg: f64,
    /// Service-wide visibility range, independent of any shield radius.
    #[serde(default = "default_max_ground_distance_km")]
    pub max_ground_distance_km: f64,
    #[serde(
        default = "default_pass_window",
        deserialize_with = "deserialize_duration"
    )]
    pub pass_window: Duration,
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            min_elevation_deg: 0.0,
            max_ground_distance_km: default_max_ground_distance_km(),
            pass_window: default_pass_window(),
            max_passes: default_max_passes(),
        }
    }
}

fn default_max_ground_distance_km() -> f64 {
    3000.0
}

fn default_pass_window() -> Duration {
    Duration::from_secs(24 * 3600)
}

fn default_max_passes() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShieldsConfig {
    #[serde(
        default = "default_sweep_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub sweep_interval: Duration,
    /// How long ended shields stay readable before the sweep drops them.
    #[serde(
        default = "default_retention",
        deserialize_with = "deserialize_duration"
    )]
    pub retention: Duration,
    #[serde(default)]
    pub tiers: ShieldPolicy,
}

impl Default for ShieldsConfig {
    fn default() -> Self {
        Self {
            sweep_interval: default_sweep_interval(),
            retention: default_retention(),
            tiers: ShieldPolicy::default(),
        }
    }
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_retention() -> Duration {
    DEFAULT_RETENTION
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.catalog_file.is_none() && self.catalog.tle_folder.is_none() {
            return Err(ConfigError::Invalid(
                "catalog needs a catalog_file or a tle_folder".into(),
            ));
        }
        if !(self.visibility.max_ground_distance_km > 0.0) {
            return Err(ConfigError::Invalid(
                "visibility.max_ground_distance_km must be positive".into(),
            ));
        }
        if self.shields.sweep_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "shields.sweep_interval must be non-zero".into(),
            ));
        }
        self.shields
            .tiers
            .validate()
            .map_err(ConfigError::Invalid)
    }
}

/// Parses humantime strings such as `"5s"` or `"1h 30m"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}

fn deserialize_option_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_duration(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
