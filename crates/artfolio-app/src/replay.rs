//! Scripted event replay.
//!
//! A script is a JSON array of [`CanvasEvent`]s, e.g.
//!
//! ```json
//! [
//!   { "type": "pointer_down", "position": { "x": 10.0, "y": 10.0 } },
//!   { "type": "pointer_move", "position": { "x": 80.0, "y": 40.0 } },
//!   { "type": "pointer_up" },
//!   { "type": "add_sticker", "image": "sun" },
//!   { "type": "sticker_pinch", "sticker": 0, "phase": "began", "scale": 1.0 }
//! ]
//! ```

use crate::error::{AppError, AppResult};
use artfolio_core::{Canvas, CanvasEvent, EventOutcome};
use std::path::Path;

/// Tally of what a replay did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied: usize,
    pub ignored: usize,
    pub stickers_added: usize,
    pub stickers_removed: usize,
}

pub fn parse_script(json: &str) -> AppResult<Vec<CanvasEvent>> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_script(path: &Path) -> AppResult<Vec<CanvasEvent>> {
    let json = std::fs::read_to_string(path).map_err(|source| AppError::ReadScript {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&json)
}

/// Feed every event to the canvas in order.
pub fn replay(canvas: &mut Canvas, events: &[CanvasEvent]) -> ReplayReport {
    let mut report = ReplayReport::default();
    for event in events {
        match canvas.handle_event(event) {
            EventOutcome::Applied => report.applied += 1,
            EventOutcome::Ignored => report.ignored += 1,
            EventOutcome::StickerAdded(_) => {
                report.applied += 1;
                report.stickers_added += 1;
            }
            EventOutcome::StickerRemoved(_) => {
                report.applied += 1;
                report.stickers_removed += 1;
            }
        }
    }
    log::debug!("Replayed {} events: {:?}", events.len(), report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use artfolio_core::CanvasConfig;

    const SCRIPT: &str = r#"[
        { "type": "set_hue", "hue": 200.0 },
        { "type": "pointer_down", "position": { "x": 10.0, "y": 10.0 } },
        { "type": "pointer_move", "position": { "x": 80.0, "y": 40.0 } },
        { "type": "pointer_up" },
        { "type": "pointer_up" },
        { "type": "add_sticker", "image": "sun" },
        { "type": "add_sticker", "image": "moon" },
        { "type": "sticker_pinch", "sticker": 0, "phase": "began", "scale": 1.0 },
        { "type": "sticker_pinch", "sticker": 0, "phase": "changed", "scale": 2.0 },
        { "type": "sticker_pinch", "sticker": 0, "phase": "ended", "scale": 2.0 }
    ]"#;

    #[test]
    fn test_replay_script() {
        let events = parse_script(SCRIPT).unwrap();
        let mut canvas = Canvas::new(CanvasConfig::default(), None);

        let report = replay(&mut canvas, &events);

        assert_eq!(canvas.strokes().len(), 1);
        assert_eq!(canvas.strokes()[0].color.hue, 200.0);
        assert_eq!(canvas.sticker_count(), 1);
        assert_eq!(canvas.stickers().next().unwrap().scale, 2.0);
        assert_eq!(report.stickers_added, 1);
        // Second pointer_up and the unknown "moon" sticker.
        assert_eq!(report.ignored, 2);
        assert_eq!(report.applied, events.len() - 2);
    }

    #[test]
    fn test_drag_to_trash() {
        let events = parse_script(
            r#"[
                { "type": "add_sticker", "image": "sun" },
                { "type": "sticker_pan", "sticker": 0, "phase": "began" },
                { "type": "sticker_pan", "sticker": 0, "phase": "ended", "position": { "x": 385.0, "y": 333.0 } }
            ]"#,
        )
        .unwrap();
        let mut canvas = Canvas::new(CanvasConfig::default(), None);

        let report = replay(&mut canvas, &events);

        assert_eq!(report.stickers_removed, 1);
        assert_eq!(canvas.sticker_count(), 0);
    }

    #[test]
    fn test_bad_script() {
        assert!(matches!(parse_script(r#"[{ "type": "teleport" }]"#), Err(AppError::Script(_))));
    }

    #[test]
    fn test_missing_script_file() {
        let err = load_script(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, AppError::ReadScript { .. }));
    }
}
