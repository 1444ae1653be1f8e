//! Freehand stroke shape.

use super::BrushColor;
use kurbo::{BezPath, PathEl, Point, Rect};
use serde::{Deserialize, Serialize};

/// SVG-style path data made only of `M` and `L` commands.
///
/// Stored as the command string itself (`"M 10 20 L 11 22 ..."`) because that
/// is the representation saved sessions carry around.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathData(String);

impl PathData {
    /// Start a new path at `point`.
    pub fn move_to(point: Point) -> Self {
        Self(format!("M {} {}", point.x, point.y))
    }

    /// Wrap an existing command string without validating it.
    pub fn from_raw(d: impl Into<String>) -> Self {
        Self(d.into())
    }

    /// Append a line segment to `point`.
    pub fn line_to(&mut self, point: Point) {
        if self.0.is_empty() {
            *self = Self::move_to(point);
            return;
        }
        self.0.push_str(&format!(" L {} {}", point.x, point.y));
    }

    /// The raw command string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse into a kurbo path. Malformed data yields an empty path.
    pub fn to_bez_path(&self) -> BezPath {
        match BezPath::from_svg(&self.0) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Ignoring malformed stroke path {:?}: {}", self.0, e);
                BezPath::new()
            }
        }
    }

    /// Vertices of the path in order. Curves contribute their end point.
    pub fn points(&self) -> Vec<Point> {
        self.to_bez_path()
            .elements()
            .iter()
            .filter_map(|el| match *el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(p),
                PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => Some(p),
                PathEl::ClosePath => None,
            })
            .collect()
    }
}

/// A committed freehand stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Path commands in canvas coordinates.
    pub d: PathData,
    /// Stroke color.
    pub color: BrushColor,
    /// Stroke width in pixels.
    pub width: f64,
}

impl Stroke {
    pub fn new(d: PathData, color: BrushColor, width: f64) -> Self {
        Self { d, color, width }
    }

    /// Bounding box of the path vertices, not including the stroke width.
    pub fn bounds(&self) -> Rect {
        let points = self.d.points();
        let Some(first) = points.first() else {
            return Rect::ZERO;
        };

        points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
    }
}
