//! Brush settings and the in-progress freehand stroke.

use crate::config::{CanvasConfig, CaptureMode};
use crate::shapes::{BrushColor, PathData, Stroke};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Current brush selection driven by the hue/lightness sliders and the
/// width preset buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: BrushColor,
    pub width: f64,
}

impl Brush {
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            color: BrushColor::new(config.default_hue, config.default_lightness),
            width: config.default_brush_width,
        }
    }

    pub fn set_hue(&mut self, hue: f64) {
        self.color = BrushColor::new(hue, self.color.lightness);
    }

    pub fn set_lightness(&mut self, lightness: f64) {
        self.color = BrushColor::new(self.color.hue, lightness);
    }
}

/// A stroke being drawn, from pointer down to pointer up.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeBuilder {
    path: PathData,
    /// Brush settings frozen at `begin`, used in [`CaptureMode::Start`].
    start_brush: Brush,
}

impl StrokeBuilder {
    /// Start a path at `point`.
    pub fn begin(point: Point, brush: &Brush) -> Self {
        Self {
            path: PathData::move_to(point),
            start_brush: brush.clone(),
        }
    }

    /// Append a line segment to `point`.
    pub fn extend(&mut self, point: Point) {
        self.path.line_to(point);
    }

    /// Path drawn so far.
    pub fn path(&self) -> &PathData {
        &self.path
    }

    /// Brush to render the preview with.
    pub fn preview_brush<'a>(&'a self, current: &'a Brush, mode: CaptureMode) -> &'a Brush {
        match mode {
            CaptureMode::Release => current,
            CaptureMode::Start => &self.start_brush,
        }
    }

    /// Produce the committed stroke, picking color and width per `mode`.
    pub fn finish(self, current: &Brush, mode: CaptureMode) -> Stroke {
        let brush = match mode {
            CaptureMode::Release => current,
            CaptureMode::Start => &self.start_brush,
        };
        Stroke::new(self.path, brush.color, brush.width)
    }
}
