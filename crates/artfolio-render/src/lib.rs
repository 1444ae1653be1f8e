//! Artfolio Render Library
//!
//! Renderer abstraction and a CPU rasterizer for the Artfolio canvas,
//! plus a [`RasterSurface`] that flattens a scene to PNG for export.

mod assets;
mod encode;
mod raster;
mod renderer;
mod surface;

pub use assets::StickerAssets;
pub use encode::encode_png;
pub use raster::RasterRenderer;
pub use renderer::{MAX_PIXELS, RenderContext, RenderResult, Renderer, RendererError};
pub use surface::{PNG_MIME_TYPE, RasterSurface};
