//! Artfolio Core Library
//!
//! Platform-agnostic data structures and logic for the Artfolio profile
//! header canvas: freehand strokes, draggable stickers, gesture handling and
//! snapshot export.

pub mod canvas;
pub mod config;
pub mod gesture;
pub mod input;
pub mod session;
pub mod shapes;
pub mod snapshot;
pub mod storage;
pub mod tools;

pub use canvas::{Canvas, DropOutcome};
pub use config::{Anchor, CanvasConfig, CaptureMode, ConfigError, MAX_CANVAS_DIMENSION, StickerAsset, TrashZone};
pub use gesture::{GestureKind, GesturePhase};
pub use input::{CanvasEvent, EventOutcome, StickerTarget};
pub use session::SavedSession;
pub use shapes::{BrushColor, PathData, Sticker, StickerId, Stroke};
pub use snapshot::{CanvasScene, CaptureError, ExportError, FlattenedImage, Snapshot, SurfaceCapture};
pub use tools::Brush;
