//! Flattened snapshot export.

use crate::shapes::{Sticker, Stroke};
use crate::storage::BoxFuture;
use kurbo::Size;
use thiserror::Error;

/// Errors raised by a capture surface.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Surface unavailable: {0}")]
    Unavailable(String),
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result type for surface capture.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Errors returned from [`crate::Canvas::export_snapshot`].
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not capture drawing surface: {0}")]
    Capture(#[from] CaptureError),
}

/// Result type for snapshot export.
pub type ExportResult<T> = Result<T, ExportError>;

/// Everything a surface needs to draw one frame of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasScene {
    pub size: Size,
    /// Committed strokes, back to front.
    pub strokes: Vec<Stroke>,
    /// Stickers, back to front, drawn above all strokes.
    pub stickers: Vec<Sticker>,
}

/// A raster image produced by a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedImage {
    /// Encoded image bytes.
    pub data: Vec<u8>,
    /// MIME type of `data`, e.g. `image/png`.
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Result of a successful export: the raster plus the editable state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub image: FlattenedImage,
    pub strokes: Vec<Stroke>,
    pub stickers: Vec<Sticker>,
}

/// Something that can rasterize a [`CanvasScene`].
///
/// Capture may complete asynchronously. There is no timeout or cancellation;
/// callers wait for the surface to finish or fail.
pub trait SurfaceCapture: Send + Sync {
    fn capture(&self, scene: CanvasScene) -> BoxFuture<'_, CaptureResult<FlattenedImage>>;
}
