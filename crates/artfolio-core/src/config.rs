//! Canvas configuration.
//!
//! Everything that was a hard-coded constant on the drawing screen (brush
//! presets, slider defaults, sticker catalog, trash zone placement) lives
//! here so hosts can tune it from a TOML file.

use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Largest accepted canvas width or height.
pub const MAX_CANVAS_DIMENSION: f64 = 8192.0;

/// When a stroke picks up the brush color and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    /// Use whatever the brush is set to when the pointer is released.
    #[default]
    Release,
    /// Freeze the brush settings when the stroke begins.
    Start,
}

/// Canvas corner a region is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

/// Drop region that deletes stickers released inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrashZone {
    pub corner: Anchor,
    /// Edge length of the square region.
    pub size: f64,
    /// Extra margin added on every side when hit testing.
    pub tolerance: f64,
}

impl Default for TrashZone {
    fn default() -> Self {
        Self {
            corner: Anchor::BottomRight,
            size: 64.0,
            tolerance: 16.0,
        }
    }
}

impl TrashZone {
    /// The un-inflated region on a canvas of the given size.
    pub fn rect(&self, canvas: Size) -> Rect {
        let x0 = match self.corner {
            Anchor::TopLeft | Anchor::BottomLeft => 0.0,
            Anchor::TopRight | Anchor::BottomRight => canvas.width - self.size,
        };
        let y0 = match self.corner {
            Anchor::TopLeft | Anchor::TopRight => 0.0,
            Anchor::BottomLeft | Anchor::BottomRight => canvas.height - self.size,
        };
        Rect::new(x0, y0, x0 + self.size, y0 + self.size)
    }

    /// The region used for hit testing, inflated by the tolerance.
    pub fn hit_rect(&self, canvas: Size) -> Rect {
        self.rect(canvas).inflate(self.tolerance, self.tolerance)
    }

    pub fn contains(&self, canvas: Size, point: kurbo::Point) -> bool {
        self.hit_rect(canvas).contains(point)
    }
}

/// A named sticker image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerAsset {
    /// Name stored on placed stickers.
    pub name: String,
    /// Image path, relative to the host's assets directory.
    pub path: String,
}

/// Drawing canvas settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Surface width in pixels.
    pub width: f64,
    /// Surface height in pixels (further limited by the host's max height).
    pub height: f64,
    /// Selectable brush widths.
    pub brush_presets: Vec<f64>,
    pub default_brush_width: f64,
    pub default_hue: f64,
    pub default_lightness: f64,
    /// Edge length of newly placed stickers.
    pub default_sticker_size: f64,
    pub capture_mode: CaptureMode,
    /// Background color for exported snapshots, `#rrggbb`.
    pub background: String,
    pub trash_zone: TrashZone,
    /// Sticker catalog shown in the picker.
    pub stickers: Vec<StickerAsset>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 338.0,
            brush_presets: vec![2.0, 4.0, 8.0, 12.0, 16.0],
            default_brush_width: 4.0,
            default_hue: 120.0,
            default_lightness: 50.0,
            default_sticker_size: 50.0,
            capture_mode: CaptureMode::Release,
            background: "#ffffff".to_string(),
            trash_zone: TrashZone::default(),
            stickers: vec![StickerAsset {
                name: "sun".to_string(),
                path: "stickers/sun.png".to_string(),
            }],
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Surface size once the host's height limit is applied.
    pub fn surface_size(&self, max_height: Option<f64>) -> Size {
        let height = match max_height {
            Some(max) if max.is_finite() && max >= 0.0 => self.height.min(max),
            _ => self.height,
        };
        Size::new(self.width, height)
    }

    /// Look up a catalog entry by name.
    pub fn sticker(&self, name: &str) -> Option<&StickerAsset> {
        self.stickers.iter().find(|s| s.name == name)
    }

    /// Whether `width` is one of the brush presets.
    pub fn is_preset(&self, width: f64) -> bool {
        self.brush_presets.iter().any(|p| (p - width).abs() < f64::EPSILON)
    }

    /// Background as RGBA8.
    pub fn background_rgba(&self) -> ConfigResult<[u8; 4]> {
        parse_hex_color(&self.background)
            .ok_or_else(|| ConfigError::Invalid(format!("background color {:?}", self.background)))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.width > 0.0 && self.width.is_finite()) || !(self.height > 0.0 && self.height.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_CANVAS_DIMENSION || self.height > MAX_CANVAS_DIMENSION {
            return Err(ConfigError::Invalid(format!(
                "canvas size {}x{} exceeds {}",
                self.width, self.height, MAX_CANVAS_DIMENSION
            )));
        }
        if self.brush_presets.is_empty() || self.brush_presets.iter().any(|w| !(*w > 0.0)) {
            return Err(ConfigError::Invalid("brush presets must be non-empty and positive".into()));
        }
        if !self.is_preset(self.default_brush_width) {
            return Err(ConfigError::Invalid(format!(
                "default brush width {} is not a preset",
                self.default_brush_width
            )));
        }
        if !(self.default_sticker_size > 0.0) {
            return Err(ConfigError::Invalid("sticker size must be positive".into()));
        }
        if self.trash_zone.size < 0.0 || self.trash_zone.tolerance < 0.0 {
            return Err(ConfigError::Invalid("trash zone size and tolerance must not be negative".into()));
        }
        let mut names: Vec<&str> = self.stickers.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            return Err(ConfigError::Invalid("duplicate sticker names in catalog".into()));
        }
        self.background_rgba()?;
        Ok(())
    }
}

/// Parse `#rrggbb` or `#rrggbbaa`.
fn parse_hex_color(s: &str) -> Option<[u8; 4]> {
    let hex = s.trim().strip_prefix('#')?;
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some([channel(0)?, channel(2)?, channel(4)?, 255]),
        8 => Some([channel(0)?, channel(2)?, channel(4)?, channel(6)?]),
        _ => None,
    }
}
