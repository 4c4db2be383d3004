//! Configuration for FaxBox
//!
//! A [`Config`] bundles the dimension model, the sheet layout and where
//! output goes. Every field has a default, so a file only needs the values
//! it changes. Files are TOML or JSON, chosen by extension.
//!
//! Lookup order: an explicit path, then the `FAXBOX_CONFIG` environment
//! variable, then `<config dir>/faxbox/config.toml` if it exists, then the
//! built-in defaults.

use crate::error::{ConfigError, SettingsError, SettingsResult};
use faxbox_camtools::{rasterize, LayoutSettings};
use faxbox_core::{BoxPlan, DimensionModel, Rgb};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "FAXBOX_CONFIG";

/// Where generated files are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub dimensions: DimensionModel,
    pub layout: LayoutSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config file (JSON or TOML).
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Validate, then save to `path` (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("wrote config to {}", path.display());
        Ok(())
    }

    /// Check everything needed to generate output and derive the plan.
    pub fn plan(&self) -> SettingsResult<BoxPlan> {
        let engrave = &self.dimensions.engrave;
        if engrave.color != Rgb::ENGRAVE {
            return Err(SettingsError::InvalidSetting {
                key: "dimensions.engrave.color".to_string(),
                reason: format!("engraving must use {}, got {}", Rgb::ENGRAVE, engrave.color),
            });
        }
        rasterize(&engrave.text, engrave.pixel_size, engrave.font_spacing)?;

        self.layout.validate()?;

        if self.output.directory.as_os_str().is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "output.directory".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(BoxPlan::derive(&self.dimensions)?)
    }

    pub fn validate(&self) -> SettingsResult<()> {
        self.plan().map(|_| ())
    }

    /// Find and load the config: `explicit`, then `FAXBOX_CONFIG`, then the
    /// user config file, else defaults. Returns the file used, if any.
    pub fn discover(explicit: Option<&Path>) -> SettingsResult<(Self, Option<PathBuf>)> {
        Self::discover_from(
            explicit,
            std::env::var_os(CONFIG_ENV),
            default_config_path().ok(),
        )
    }

    fn discover_from(
        explicit: Option<&Path>,
        env: Option<OsString>,
        user_file: Option<PathBuf>,
    ) -> SettingsResult<(Self, Option<PathBuf>)> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
            .or_else(|| user_file.filter(|p| p.is_file()));

        match path {
            Some(path) => {
                let config = Self::load_from_file(&path)?;
                Ok((config, Some(path)))
            }
            None => {
                debug!("no config file, using defaults");
                Ok((Self::default(), None))
            }
        }
    }
}

/// `<config dir>/faxbox/config.toml`
pub fn default_config_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("faxbox").join("config.toml"))
        .ok_or_else(|| ConfigError::NoConfigDirectory.into())
}
