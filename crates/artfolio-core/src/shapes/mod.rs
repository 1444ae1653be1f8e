//! Drawable items on the canvas: freehand strokes and stickers.

mod sticker;
mod stroke;

pub use sticker::{Sticker, StickerId};
pub(crate) use sticker::centered_origin;
pub use stroke::{PathData, Stroke};

use peniko::Color;
use peniko::color::{AlphaColor, Hsl, Srgb};
use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of the hue slider, in degrees.
pub const HUE_MAX: f64 = 360.0;
/// Upper bound (inclusive) of the lightness slider, in percent.
pub const LIGHTNESS_MAX: f64 = 100.0;
/// Saturation is fixed for every brush color.
pub const BRUSH_SATURATION: f64 = 100.0;

/// A brush color picked from the hue and lightness sliders.
///
/// Saturation is always 100%, so the pair `(hue, lightness)` fully describes
/// the color. Serialized as the two slider values so a resumed session keeps
/// exactly what the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushColor {
    /// Hue in degrees, `[0, 360)`.
    pub hue: f64,
    /// Lightness in percent, `[0, 100]`.
    pub lightness: f64,
}

impl BrushColor {
    /// Create a color, normalizing hue into `[0, 360)` and clamping lightness.
    pub fn new(hue: f64, lightness: f64) -> Self {
        Self {
            hue: normalize_hue(hue),
            lightness: clamp_lightness(lightness),
        }
    }

    /// Convert to an sRGB peniko color.
    pub fn to_color(&self) -> Color {
        let hsl = AlphaColor::<Hsl>::new([
            self.hue as f32,
            BRUSH_SATURATION as f32,
            self.lightness as f32,
            1.0,
        ]);
        hsl.convert::<Srgb>()
    }

    /// RGBA8 components of [`Self::to_color`].
    pub fn to_rgba8(&self) -> [u8; 4] {
        let rgba = self.to_color().to_rgba8();
        [rgba.r, rgba.g, rgba.b, rgba.a]
    }
}

impl Default for BrushColor {
    fn default() -> Self {
        Self::new(120.0, 50.0)
    }
}

/// Wrap a hue value into `[0, 360)`. Non-finite input maps to 0.
pub fn normalize_hue(hue: f64) -> f64 {
    if !hue.is_finite() {
        return 0.0;
    }
    let wrapped = hue.rem_euclid(HUE_MAX);
    // rem_euclid can round up to exactly HUE_MAX for tiny negative inputs
    if wrapped >= HUE_MAX { 0.0 } else { wrapped }
}

/// Clamp a lightness value into `[0, 100]`. Non-finite input maps to 0.
pub fn clamp_lightness(lightness: f64) -> f64 {
    if !lightness.is_finite() {
        return 0.0;
    }
    lightness.clamp(0.0, LIGHTNESS_MAX)
}
