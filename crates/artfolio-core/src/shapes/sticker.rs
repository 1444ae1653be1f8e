//! Sticker overlays placed on top of the strokes.

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identity of a placed sticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickerId(Uuid);

impl StickerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StickerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A square decorative image placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub id: StickerId,
    /// Name of the catalog asset to draw.
    pub image: String,
    /// Top-left corner, relative to the canvas origin.
    pub position: Point,
    /// Edge length before scaling.
    pub size: f64,
    /// Committed pinch scale.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Committed rotation in radians.
    #[serde(default)]
    pub rotation: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Sticker {
    /// Create a sticker with its top-left corner at `position`.
    pub fn new(image: impl Into<String>, position: Point, size: f64) -> Self {
        Self {
            id: StickerId::new(),
            image: image.into(),
            position,
            size,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    /// Unscaled, unrotated square occupied by the sticker.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.size, self.size))
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Move the sticker so that its center lands on `point`.
    pub fn center_on(&mut self, point: Point) {
        self.position = centered_origin(point, self.size);
    }

    /// Transform mapping the unit square `[0,1]²` onto the sticker as drawn.
    ///
    /// Scale and rotation are applied about the sticker center.
    pub fn transform(&self) -> Affine {
        let center = self.center();
        Affine::translate(center.to_vec2())
            * Affine::rotate(self.rotation)
            * Affine::scale(self.scale)
            * Affine::translate(Vec2::new(-self.size / 2.0, -self.size / 2.0))
            * Affine::scale(self.size)
    }
}

/// Top-left corner of a square of edge `size` centered on `point`.
pub(crate) fn centered_origin(point: Point, size: f64) -> Point {
    Point::new(point.x - size / 2.0, point.y - size / 2.0)
}
