//! Headless capture surface backed by the CPU rasterizer.

use crate::assets::StickerAssets;
use crate::encode::encode_png;
use crate::raster::RasterRenderer;
use crate::renderer::{RenderContext, Renderer, RendererError};
use artfolio_core::snapshot::{CaptureError, CaptureResult};
use artfolio_core::storage::BoxFuture;
use artfolio_core::{CanvasConfig, CanvasScene, FlattenedImage, SurfaceCapture};
use peniko::Color;

pub const PNG_MIME_TYPE: &str = "image/png";

/// Flattens scenes to PNG using [`RasterRenderer`].
pub struct RasterSurface {
    assets: StickerAssets,
    background: Color,
    scale_factor: f64,
}

impl RasterSurface {
    pub fn new(assets: StickerAssets) -> Self {
        Self {
            assets,
            background: Color::from_rgba8(255, 255, 255, 255),
            scale_factor: 1.0,
        }
    }

    /// Surface using the configured background color.
    pub fn from_config(config: &CanvasConfig, assets: StickerAssets) -> Self {
        let [r, g, b, a] = config.background_rgba().unwrap_or_else(|e| {
            log::warn!("{}, falling back to white", e);
            [255, 255, 255, 255]
        });
        Self::new(assets).with_background(Color::from_rgba8(r, g, b, a))
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    fn flatten(&self, scene: &CanvasScene) -> CaptureResult<FlattenedImage> {
        let ctx = RenderContext::new(scene)
            .with_scale_factor(self.scale_factor)
            .with_background(self.background);
        let image = RasterRenderer::new(&self.assets)
            .render(&ctx)
            .map_err(|e| CaptureError::Render(e.to_string()))?;
        let (width, height) = image.dimensions();
        let data = encode_png(&image).map_err(|e| match e {
            RendererError::Encode(msg) => CaptureError::Encode(msg),
            other => CaptureError::Encode(other.to_string()),
        })?;

        Ok(FlattenedImage {
            data,
            mime_type: PNG_MIME_TYPE,
            width,
            height,
        })
    }
}

impl SurfaceCapture for RasterSurface {
    fn capture(&self, scene: CanvasScene) -> BoxFuture<'_, CaptureResult<FlattenedImage>> {
        Box::pin(async move { self.flatten(&scene) })
    }
}
