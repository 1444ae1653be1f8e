//! Application configuration.

use artfolio_core::CanvasConfig;
use artfolio_core::config::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the user config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Host-level settings plus the canvas configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where sessions and flattened drawings are written.
    /// Falls back to the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Directory sticker catalog paths are resolved against.
    pub assets_dir: PathBuf,
    /// Height of the profile header the editor is embedded in.
    pub header_height: Option<f64>,
    pub canvas: CanvasConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            assets_dir: PathBuf::from("assets"),
            header_height: None,
            canvas: CanvasConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.canvas.validate()?;
        if let Some(h) = config.header_height.filter(|h| !(h.is_finite() && *h > 0.0)) {
            return Err(ConfigError::Invalid(format!("header height must be positive, got {}", h)));
        }
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load from `path`, or from the user config directory when `None`.
    ///
    /// A missing file yields the defaults; a file that exists but fails to
    /// parse is an error.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        log::info!("Loading config from {}", path.display());
        Self::load(&path)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolved data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .or_else(dirs::home_dir)
                .map(|base| base.join("artfolio"))
                .unwrap_or_else(|| PathBuf::from("artfolio-data"))
        })
    }
}

/// `<config dir>/artfolio/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("artfolio").join(CONFIG_FILE_NAME))
}
