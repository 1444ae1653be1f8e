//! Drawing canvas session state.

use crate::config::CanvasConfig;
use crate::gesture::{Angle, GestureKind, GesturePhase, Scale, StickerGesture};
use crate::input::{CanvasEvent, EventOutcome, StickerTarget};
use crate::session::SavedSession;
use crate::shapes::centered_origin;
use crate::shapes::{PathData, Sticker, StickerId, Stroke};
use crate::snapshot::{CanvasScene, ExportResult, Snapshot, SurfaceCapture};
use crate::tools::{Brush, StrokeBuilder};
use kurbo::{Point, Size, Vec2};
use std::collections::HashMap;

/// What the single pointer-down sequence on the surface is doing.
///
/// Drawing and sticker manipulation are mutually exclusive; whichever starts
/// first owns the surface until it finishes.
#[derive(Debug, Clone, Default)]
enum InputMode {
    #[default]
    Idle,
    Drawing(StrokeBuilder),
    Manipulating {
        sticker: StickerId,
        gesture: StickerGesture,
    },
}

/// Result of releasing a dragged sticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The sticker was re-centered on the drop point.
    Moved,
    /// The sticker was dropped on the trash zone and deleted.
    Removed,
    /// No drag of that sticker was in progress.
    Ignored,
}

/// A drawing session: committed strokes, placed stickers, and whatever
/// gesture is currently in flight.
#[derive(Debug, Clone)]
pub struct Canvas {
    config: CanvasConfig,
    size: Size,
    brush: Brush,
    strokes: Vec<Stroke>,
    stickers: HashMap<StickerId, Sticker>,
    /// Placement order of stickers (back to front).
    sticker_order: Vec<StickerId>,
    mode: InputMode,
}

impl Canvas {
    /// Create an empty canvas. `max_height` limits the surface height.
    pub fn new(config: CanvasConfig, max_height: Option<f64>) -> Self {
        let size = config.surface_size(max_height);
        let brush = Brush::from_config(&config);
        Self {
            config,
            size,
            brush,
            strokes: Vec::new(),
            stickers: HashMap::new(),
            sticker_order: Vec::new(),
            mode: InputMode::Idle,
        }
    }

    /// Create a canvas that resumes a previously saved session.
    pub fn with_session(config: CanvasConfig, max_height: Option<f64>, session: SavedSession) -> Self {
        let mut canvas = Self::new(config, max_height);
        canvas.strokes = session.strokes;
        for sticker in session.stickers {
            if canvas.stickers.contains_key(&sticker.id) {
                log::warn!("Duplicate sticker {} in saved session, keeping the first", sticker.id);
                continue;
            }
            canvas.sticker_order.push(sticker.id);
            canvas.stickers.insert(sticker.id, sticker);
        }
        log::debug!(
            "Canvas resumed with {} strokes and {} stickers",
            canvas.strokes.len(),
            canvas.sticker_order.len()
        );
        canvas
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Drawing surface size.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Committed strokes, oldest first.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Stickers in placement order, with committed transforms.
    pub fn stickers(&self) -> impl Iterator<Item = &Sticker> {
        self.sticker_order.iter().filter_map(|id| self.stickers.get(id))
    }

    pub fn sticker(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.get(&id)
    }

    pub fn sticker_count(&self) -> usize {
        self.stickers.len()
    }

    /// Path and brush of the stroke being drawn, for preview rendering.
    pub fn in_progress(&self) -> Option<(&PathData, &Brush)> {
        match &self.mode {
            InputMode::Drawing(builder) => Some((
                builder.path(),
                builder.preview_brush(&self.brush, self.config.capture_mode),
            )),
            _ => None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, InputMode::Drawing(_))
    }

    /// Sticker currently held by a gesture, if any.
    pub fn active_sticker(&self) -> Option<StickerId> {
        match self.mode {
            InputMode::Manipulating { sticker, .. } => Some(sticker),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.stickers.is_empty()
    }

    // --- brush controls ---

    pub fn set_hue(&mut self, hue: f64) {
        self.brush.set_hue(hue);
    }

    pub fn set_lightness(&mut self, lightness: f64) {
        self.brush.set_lightness(lightness);
    }

    /// Pick a brush width. Only configured presets are accepted.
    pub fn select_brush_width(&mut self, width: f64) -> bool {
        if !self.config.is_preset(width) {
            log::debug!("Ignoring brush width {} (not a preset)", width);
            return false;
        }
        self.brush.width = width;
        true
    }

    // --- strokes ---

    /// Start a stroke at `point`. Ignored while a sticker gesture owns the
    /// surface or another stroke is in progress.
    pub fn begin_stroke(&mut self, point: Point) -> bool {
        match self.mode {
            InputMode::Idle => {
                self.mode = InputMode::Drawing(StrokeBuilder::begin(point, &self.brush));
                true
            }
            InputMode::Drawing(_) => {
                log::debug!("Ignoring stroke start: a stroke is already in progress");
                false
            }
            InputMode::Manipulating { sticker, .. } => {
                log::debug!("Ignoring stroke start: sticker {} is being manipulated", sticker);
                false
            }
        }
    }

    /// Append a segment to the in-progress stroke.
    pub fn extend_stroke(&mut self, point: Point) -> bool {
        if let InputMode::Drawing(builder) = &mut self.mode {
            builder.extend(point);
            true
        } else {
            false
        }
    }

    /// Commit the in-progress stroke.
    pub fn commit_stroke(&mut self) -> bool {
        if !self.is_drawing() {
            return false;
        }
        let InputMode::Drawing(builder) = std::mem::take(&mut self.mode) else {
            return false;
        };
        let stroke = builder.finish(&self.brush, self.config.capture_mode);
        log::debug!("Committed stroke #{} (width {})", self.strokes.len() + 1, stroke.width);
        self.strokes.push(stroke);
        true
    }

    /// Remove the most recently committed stroke.
    pub fn undo(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    /// Remove all committed strokes and the in-progress stroke. Stickers stay.
    pub fn clear(&mut self) {
        self.strokes.clear();
        if self.is_drawing() {
            self.mode = InputMode::Idle;
        }
    }

    // --- stickers ---

    /// Place a catalog sticker at the default size.
    ///
    /// Both coordinates are half the surface height minus half the sticker
    /// size.
    pub fn add_sticker(&mut self, image: &str) -> Option<StickerId> {
        if self.config.sticker(image).is_none() {
            log::warn!("Unknown sticker {:?}, not placing it", image);
            return None;
        }
        let size = self.config.default_sticker_size;
        let offset = self.size.height / 2.0 - size / 2.0;
        let sticker = Sticker::new(image, Point::new(offset, offset), size);
        let id = sticker.id;
        self.sticker_order.push(id);
        self.stickers.insert(id, sticker);
        log::debug!("Placed sticker {} ({})", id, image);
        Some(id)
    }

    /// Start dragging a sticker. Disables freehand input until the drag ends.
    pub fn begin_sticker_drag(&mut self, id: StickerId) -> bool {
        match self.acquire(id) {
            Some(gesture) => {
                gesture.translation.begin();
                true
            }
            None => false,
        }
    }

    /// Move the dragged sticker's live position so it is centered on `point`.
    /// The committed position is left alone until the drag ends.
    pub fn update_sticker_drag(&mut self, id: StickerId, point: Point) -> bool {
        let Some(sticker) = self.stickers.get(&id) else {
            return false;
        };
        let target = centered_origin(point, sticker.size);
        let delta: Vec2 = target - sticker.position;
        match self.held_gesture(id, GestureKind::Pan) {
            Some(gesture) => {
                gesture.translation.update(delta);
                true
            }
            None => false,
        }
    }

    /// Release a dragged sticker at `point`.
    ///
    /// Dropping inside the (tolerance-inflated) trash zone deletes the
    /// sticker. Otherwise the sticker is re-centered on `point`.
    pub fn end_sticker_drag(&mut self, id: StickerId, point: Point) -> DropOutcome {
        if self.held_gesture(id, GestureKind::Pan).is_none() {
            return DropOutcome::Ignored;
        }

        if self.config.trash_zone.contains(self.size, point) {
            self.remove_sticker(id);
            self.mode = InputMode::Idle;
            log::debug!("Sticker {} dropped on trash zone", id);
            return DropOutcome::Removed;
        }

        if let Some(sticker) = self.stickers.get_mut(&id) {
            sticker.center_on(point);
        }
        if let Some(gesture) = self.held_gesture(id, GestureKind::Pan) {
            gesture.translation.commit_to(Vec2::ZERO);
        }
        self.release_if_done();
        DropOutcome::Moved
    }

    /// Feed a pinch recognizer callback. `scale` is cumulative since `began`.
    pub fn sticker_pinch(&mut self, id: StickerId, phase: GesturePhase, scale: f64) -> bool {
        if !scale.is_finite() || scale <= 0.0 {
            return false;
        }
        let Some(gesture) = self.gesture_for(id, GestureKind::Pinch, phase) else {
            return false;
        };
        gesture.scale.apply(phase, Scale(scale));
        self.sync_committed(id);
        true
    }

    /// Feed a rotation recognizer callback. `rotation` is cumulative radians
    /// since `began`.
    pub fn sticker_rotate(&mut self, id: StickerId, phase: GesturePhase, rotation: f64) -> bool {
        if !rotation.is_finite() {
            return false;
        }
        let Some(gesture) = self.gesture_for(id, GestureKind::Rotate, phase) else {
            return false;
        };
        gesture.rotation.apply(phase, Angle(rotation));
        self.sync_committed(id);
        true
    }

    /// The sticker as it should be drawn right now, including in-flight
    /// gesture deltas.
    pub fn live_sticker(&self, id: StickerId) -> Option<Sticker> {
        let mut sticker = self.stickers.get(&id)?.clone();
        if let InputMode::Manipulating { sticker: held, gesture } = &self.mode {
            if *held == id {
                sticker.position += gesture.translation.live();
                sticker.scale = gesture.scale.live().0;
                sticker.rotation = gesture.rotation.live().0;
            }
        }
        Some(sticker)
    }

    /// Resolve an event's sticker reference.
    pub fn resolve(&self, target: StickerTarget) -> Option<StickerId> {
        match target {
            StickerTarget::Id(id) => self.stickers.contains_key(&id).then_some(id),
            StickerTarget::Index(i) => self.sticker_order.get(i).copied(),
        }
    }

    // --- session ---

    /// Committed state handed to the surface for rasterizing.
    pub fn scene(&self) -> CanvasScene {
        CanvasScene {
            size: self.size,
            strokes: self.strokes.clone(),
            stickers: self.stickers().cloned().collect(),
        }
    }

    /// Editable state for persistence.
    pub fn session(&self) -> SavedSession {
        SavedSession::new(self.strokes.clone(), self.stickers().cloned().collect())
    }

    /// Rasterize the committed strokes and stickers.
    ///
    /// The returned snapshot also carries the vector state untouched, so a
    /// later session can resume from it. Capture failures are returned once;
    /// nothing is retried.
    pub async fn export_snapshot<S>(&self, surface: &S) -> ExportResult<Snapshot>
    where
        S: SurfaceCapture + ?Sized,
    {
        let scene = self.scene();
        let image = match surface.capture(scene).await {
            Ok(image) => image,
            Err(e) => {
                log::error!("Snapshot export failed: {}", e);
                return Err(e.into());
            }
        };
        log::info!(
            "Exported {}x{} snapshot ({} bytes, {} strokes, {} stickers)",
            image.width,
            image.height,
            image.data.len(),
            self.strokes.len(),
            self.stickers.len()
        );
        Ok(Snapshot {
            image,
            strokes: self.strokes.clone(),
            stickers: self.stickers().cloned().collect(),
        })
    }

    /// Discard the whole session without exporting.
    pub fn cancel(&mut self) {
        self.strokes.clear();
        self.stickers.clear();
        self.sticker_order.clear();
        self.mode = InputMode::Idle;
    }

    /// Dispatch one input event.
    pub fn handle_event(&mut self, event: &CanvasEvent) -> EventOutcome {
        let applied = |ok: bool| if ok { EventOutcome::Applied } else { EventOutcome::Ignored };
        match event {
            CanvasEvent::PointerDown { position } => applied(self.begin_stroke(*position)),
            CanvasEvent::PointerMove { position } => applied(self.extend_stroke(*position)),
            CanvasEvent::PointerUp => applied(self.commit_stroke()),
            CanvasEvent::StickerPan { sticker, phase, position } => {
                let Some(id) = self.resolve(*sticker) else {
                    return EventOutcome::Ignored;
                };
                match phase {
                    GesturePhase::Began => applied(self.begin_sticker_drag(id)),
                    GesturePhase::Changed => applied(self.update_sticker_drag(id, *position)),
                    // A cancelled pan still drops the sticker where the finger was.
                    GesturePhase::Ended | GesturePhase::Cancelled => {
                        match self.end_sticker_drag(id, *position) {
                            DropOutcome::Moved => EventOutcome::Applied,
                            DropOutcome::Removed => EventOutcome::StickerRemoved(id),
                            DropOutcome::Ignored => EventOutcome::Ignored,
                        }
                    }
                }
            }
            CanvasEvent::StickerPinch { sticker, phase, scale } => match self.resolve(*sticker) {
                Some(id) => applied(self.sticker_pinch(id, *phase, *scale)),
                None => EventOutcome::Ignored,
            },
            CanvasEvent::StickerRotate { sticker, phase, rotation } => match self.resolve(*sticker) {
                Some(id) => applied(self.sticker_rotate(id, *phase, *rotation)),
                None => EventOutcome::Ignored,
            },
            CanvasEvent::SetHue { hue } => {
                self.set_hue(*hue);
                EventOutcome::Applied
            }
            CanvasEvent::SetLightness { lightness } => {
                self.set_lightness(*lightness);
                EventOutcome::Applied
            }
            CanvasEvent::SelectBrush { width } => applied(self.select_brush_width(*width)),
            CanvasEvent::AddSticker { image } => match self.add_sticker(image) {
                Some(id) => EventOutcome::StickerAdded(id),
                None => EventOutcome::Ignored,
            },
            CanvasEvent::Undo => applied(self.undo().is_some()),
            CanvasEvent::Clear => {
                self.clear();
                EventOutcome::Applied
            }
        }
    }

    // --- gesture bookkeeping ---

    /// Take hold of a sticker for a new gesture, or join the gesture set
    /// already holding it.
    fn acquire(&mut self, id: StickerId) -> Option<&mut StickerGesture> {
        let (scale, rotation) = self.stickers.get(&id).map(|s| (s.scale, s.rotation))?;
        match &self.mode {
            InputMode::Idle => {
                self.mode = InputMode::Manipulating {
                    sticker: id,
                    gesture: StickerGesture::new(scale, rotation),
                };
            }
            InputMode::Drawing(_) => {
                log::debug!("Ignoring gesture on sticker {}: a stroke is in progress", id);
                return None;
            }
            InputMode::Manipulating { sticker: held, .. } if *held != id => {
                log::debug!("Ignoring gesture on sticker {}: sticker {} is held", id, held);
                return None;
            }
            InputMode::Manipulating { .. } => {}
        }
        match &mut self.mode {
            InputMode::Manipulating { gesture, .. } => Some(gesture),
            _ => None,
        }
    }

    /// The gesture state for `id` if recognizer `kind` is active on it.
    fn held_gesture(&mut self, id: StickerId, kind: GestureKind) -> Option<&mut StickerGesture> {
        match &mut self.mode {
            InputMode::Manipulating { sticker, gesture } if *sticker == id && gesture.is_active(kind) => {
                Some(gesture)
            }
            _ => None,
        }
    }

    /// Acquire on `began`; otherwise require the recognizer to be active.
    fn gesture_for(&mut self, id: StickerId, kind: GestureKind, phase: GesturePhase) -> Option<&mut StickerGesture> {
        match phase {
            GesturePhase::Began => self.acquire(id),
            _ => self.held_gesture(id, kind),
        }
    }

    /// Copy committed scale/rotation back onto the sticker and release the
    /// surface once no recognizer holds it.
    fn sync_committed(&mut self, id: StickerId) {
        if let InputMode::Manipulating { sticker: held, gesture } = &self.mode {
            if *held == id {
                if let Some(sticker) = self.stickers.get_mut(&id) {
                    sticker.scale = gesture.scale.base.0;
                    sticker.rotation = gesture.rotation.base.0;
                }
            }
        }
        self.release_if_done();
    }

    fn release_if_done(&mut self) {
        if let InputMode::Manipulating { gesture, .. } = &self.mode {
            if !gesture.any_active() {
                self.mode = InputMode::Idle;
            }
        }
    }

    fn remove_sticker(&mut self, id: StickerId) -> Option<Sticker> {
        self.sticker_order.retain(|&s| s != id);
        self.stickers.remove(&id)
    }
}
