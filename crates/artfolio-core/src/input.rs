//! Input events delivered to the canvas by the host's event loop.

use crate::gesture::GesturePhase;
use crate::shapes::StickerId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// One discrete pointer, gesture, or control event.
///
/// Events are serializable so a session can be scripted and replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// Pointer pressed on the drawing surface.
    PointerDown { position: Point },
    /// Pointer moved while pressed.
    PointerMove { position: Point },
    /// Pointer released.
    PointerUp,

    /// Pan recognizer on a sticker. `position` is the pointer in canvas
    /// coordinates; ignored for `began`.
    StickerPan {
        sticker: StickerTarget,
        phase: GesturePhase,
        #[serde(default)]
        position: Point,
    },
    /// Pinch recognizer on a sticker. `scale` is cumulative since `began`.
    StickerPinch {
        sticker: StickerTarget,
        phase: GesturePhase,
        scale: f64,
    },
    /// Rotation recognizer on a sticker. `rotation` (radians) is cumulative
    /// since `began`.
    StickerRotate {
        sticker: StickerTarget,
        phase: GesturePhase,
        rotation: f64,
    },

    SetHue { hue: f64 },
    SetLightness { lightness: f64 },
    SelectBrush { width: f64 },
    AddSticker { image: String },
    Undo,
    Clear,
}

/// How an event names the sticker it acts on.
///
/// Scripts cannot know generated ids up front, so they may refer to stickers
/// by placement order instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StickerTarget {
    Id(StickerId),
    /// Zero-based index in placement order.
    Index(usize),
}

impl From<StickerId> for StickerTarget {
    fn from(id: StickerId) -> Self {
        Self::Id(id)
    }
}

/// What happened as a result of an event, for hosts that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event changed canvas state.
    Applied,
    /// The event was valid but had nothing to act on, or was rejected by the
    /// input-mode rules.
    Ignored,
    /// A sticker was placed.
    StickerAdded(StickerId),
    /// A sticker was dropped on the trash zone.
    StickerRemoved(StickerId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_format() {
        let json = r#"[
            {"type": "pointer_down", "position": {"x": 1.0, "y": 2.0}},
            {"type": "pointer_up"},
            {"type": "add_sticker", "image": "sun"},
            {"type": "sticker_pan", "sticker": 0, "phase": "began"},
            {"type": "sticker_pinch", "sticker": 0, "phase": "changed", "scale": 1.5},
            {"type": "select_brush", "width": 8.0}
        ]"#;
        let events: Vec<CanvasEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 6);
        assert_eq!(
            events[3],
            CanvasEvent::StickerPan {
                sticker: StickerTarget::Index(0),
                phase: GesturePhase::Began,
                position: Point::ZERO,
            }
        );
    }

    #[test]
    fn test_target_by_id() {
        let id = StickerId::new();
        let json = serde_json::to_string(&StickerTarget::from(id)).unwrap();
        let back: StickerTarget = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StickerTarget::Id(id));
    }
}
