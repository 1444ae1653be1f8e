//! Renderer trait abstraction.

use artfolio_core::CanvasScene;
use artfolio_core::shapes::PathData;
use artfolio_core::tools::Brush;
use image::RgbaImage;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("Missing sticker asset: {0}")]
    MissingAsset(String),
    #[error("Asset decode failed: {0}")]
    Decode(String),
    #[error("PNG encode failed: {0}")]
    Encode(String),
}

/// Largest output the rasterizer allocates, in pixels (256 MiB of RGBA).
pub const MAX_PIXELS: u64 = 1 << 26;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render.
pub struct RenderContext<'a> {
    /// Committed strokes and stickers to draw.
    pub scene: &'a CanvasScene,
    /// Device pixel ratio (for HiDPI output).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Stroke being drawn, rendered above committed strokes and below stickers.
    pub preview: Option<(&'a PathData, &'a Brush)>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(scene: &'a CanvasScene) -> Self {
        Self {
            scene,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            preview: None,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Include the in-progress stroke.
    pub fn with_preview(mut self, preview: Option<(&'a PathData, &'a Brush)>) -> Self {
        self.preview = preview;
        self
    }

    /// Output size in pixels, at most [`MAX_PIXELS`] in total.
    pub fn pixel_size(&self) -> RenderResult<(u32, u32)> {
        let width = (self.scene.size.width * self.scale_factor).round();
        let height = (self.scene.size.height * self.scale_factor).round();
        let valid = |v: f64| v.is_finite() && v >= 1.0 && v <= u32::MAX as f64;
        if !valid(width) || !valid(height) {
            return Err(RendererError::InvalidSize { width, height });
        }
        let (w, h) = (width as u32, height as u32);
        if u64::from(w) * u64::from(h) > MAX_PIXELS {
            return Err(RendererError::InvalidSize { width, height });
        }
        Ok((w, h))
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Flatten the scene into an RGBA image.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RgbaImage>;
}
