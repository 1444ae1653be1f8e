//! Two-phase gesture values for sticker manipulation.
//!
//! Every transform channel (translation, scale, rotation) keeps a committed
//! `base` and an in-flight `delta` reported by its own recognizer. The value
//! shown on screen is `base ⊗ delta`; `base` only changes when that
//! recognizer ends. Because each recognizer only ever touches its own channel,
//! concurrently active pan/pinch/rotate gestures never double-apply a delta,
//! whatever order their callbacks arrive in.

use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Lifecycle phase reported by a gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Which recognizer a callback comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Pan,
    Pinch,
    Rotate,
}

/// Whether a channel currently has an in-flight delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Active,
}

/// How deltas combine with the committed value of a channel.
pub trait Compose: Copy {
    /// The delta that leaves a value unchanged.
    const IDENTITY: Self;

    fn compose(self, delta: Self) -> Self;
}

/// Additive translation.
impl Compose for Vec2 {
    const IDENTITY: Self = Vec2::ZERO;

    fn compose(self, delta: Self) -> Self {
        self + delta
    }
}

/// Multiplicative pinch scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(pub f64);

impl Compose for Scale {
    const IDENTITY: Self = Scale(1.0);

    fn compose(self, delta: Self) -> Self {
        Scale(self.0 * delta.0)
    }
}

/// Additive rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle(pub f64);

impl Compose for Angle {
    const IDENTITY: Self = Angle(0.0);

    fn compose(self, delta: Self) -> Self {
        Angle(self.0 + delta.0)
    }
}

/// A committed value plus the in-flight delta of one recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoPhase<T: Compose> {
    pub base: T,
    pub delta: T,
    pub phase: Phase,
}

impl<T: Compose> TwoPhase<T> {
    pub fn new(base: T) -> Self {
        Self {
            base,
            delta: T::IDENTITY,
            phase: Phase::Idle,
        }
    }

    /// Value to display right now.
    pub fn live(&self) -> T {
        self.base.compose(self.delta)
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Start tracking a new delta from the identity.
    pub fn begin(&mut self) {
        self.delta = T::IDENTITY;
        self.phase = Phase::Active;
    }

    /// Replace the in-flight delta (deltas are cumulative since `begin`).
    pub fn update(&mut self, delta: T) {
        if self.phase == Phase::Idle {
            self.begin();
        }
        self.delta = delta;
    }

    /// Fold the in-flight delta into the base.
    pub fn commit(&mut self) -> T {
        self.base = self.live();
        self.reset();
        self.base
    }

    /// Overwrite the base directly, dropping any delta.
    pub fn commit_to(&mut self, base: T) {
        self.base = base;
        self.reset();
    }

    /// Drop the in-flight delta.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Feed one recognizer callback into the channel.
    pub fn apply(&mut self, phase: GesturePhase, delta: T) {
        match phase {
            GesturePhase::Began => {
                self.begin();
                self.delta = delta;
            }
            GesturePhase::Changed => self.update(delta),
            GesturePhase::Ended => {
                self.update(delta);
                self.commit();
            }
            GesturePhase::Cancelled => self.cancel(),
        }
    }

    fn reset(&mut self) {
        self.delta = T::IDENTITY;
        self.phase = Phase::Idle;
    }
}

/// Live transform state of one sticker while it is being manipulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickerGesture {
    /// Offset from the committed position.
    pub translation: TwoPhase<Vec2>,
    pub scale: TwoPhase<Scale>,
    pub rotation: TwoPhase<Angle>,
}

impl StickerGesture {
    /// Start from a sticker's committed scale and rotation.
    pub fn new(scale: f64, rotation: f64) -> Self {
        Self {
            translation: TwoPhase::new(Vec2::ZERO),
            scale: TwoPhase::new(Scale(scale)),
            rotation: TwoPhase::new(Angle(rotation)),
        }
    }

    pub fn is_active(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Pan => self.translation.is_active(),
            GestureKind::Pinch => self.scale.is_active(),
            GestureKind::Rotate => self.rotation.is_active(),
        }
    }

    /// True while any recognizer holds the sticker.
    pub fn any_active(&self) -> bool {
        self.translation.is_active() || self.scale.is_active() || self.rotation.is_active()
    }
}
