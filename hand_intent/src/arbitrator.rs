//! Hand vs. mouse arbitration.
//!
//! Two producers feed one pointer:
//!
//! * the perception path, delivered as [`PerceptionEvent`] messages at the
//!   camera's own cadence, which runs the normalizer and classifier;
//! * the mouse path, called synchronously from window events.
//!
//! While a hand is detected it owns the pointer and mouse motion is ignored.
//! Without a hand the mouse writes the pointer raw.  A mouse press counts as
//! a pinch only when no hand is detected, so the two sources can never both
//! trigger one selection.  There is no mouse equivalent of the open palm.
//!
//! Once per tick the consumer calls [`InputArbitrator::take_frame`], which
//! snapshots the pointer and drains both trigger latches.

use std::time::Instant;

use tracing::{debug, warn};

use crate::classifier::{GestureClassifier, GestureConfig, GestureLevels};
use crate::error::IntentError;
use crate::landmark::{Landmark, LandmarkSnapshot};
use crate::normalizer::{LandmarkNormalizer, PointerConfig, PointerState, Viewport};
use crate::trigger::{GestureEvent, Latch};

// ════════════════════════════════════════════════════════════════════════════
// PerceptionEvent — what a hand tracker delivers
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum PerceptionEvent {
    /// One hand's raw landmarks and the moment they were captured.
    Hand(Vec<Landmark>, Instant),
    /// The tracker ran but saw no hand.
    NoHand,
    /// The tracker failed or stopped for good.
    Unavailable(String),
}

/// Where the perception source stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PerceptionStatus {
    /// Nothing received yet.
    Pending,
    Active,
    /// Permanently on mouse input.
    Unavailable(String),
}

// ════════════════════════════════════════════════════════════════════════════
// InputFrame
// ════════════════════════════════════════════════════════════════════════════

/// Everything the interaction machine sees for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputFrame {
    pub pointer:         PointerState,
    pub pinch_triggered: bool,
    pub palm_triggered:  bool,
}

impl InputFrame {
    /// A frame with no triggers.
    pub fn idle(pointer: PointerState) -> Self {
        InputFrame { pointer, pinch_triggered: false, palm_triggered: false }
    }

    pub fn events(&self) -> impl Iterator<Item = GestureEvent> {
        let pinch = self.pinch_triggered.then_some(GestureEvent::PinchTriggered);
        let palm  = self.palm_triggered.then_some(GestureEvent::PalmTriggered);
        pinch.into_iter().chain(palm)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// InputArbitrator
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct InputArbitrator {
    normalizer: LandmarkNormalizer,
    classifier: GestureClassifier,
    levels:     GestureLevels,
    pinch:      Latch,
    palm:       Latch,
    status:     PerceptionStatus,
}

impl InputArbitrator {
    pub fn new(pointer: PointerConfig, gesture: GestureConfig, viewport: Viewport) -> Self {
        InputArbitrator {
            normalizer: LandmarkNormalizer::new(pointer, viewport),
            classifier: GestureClassifier::new(gesture),
            levels:     GestureLevels::default(),
            pinch:      Latch::new(),
            palm:       Latch::new(),
            status:     PerceptionStatus::Pending,
        }
    }

    // ── perception path ──────────────────────────────────────────────────

    pub fn on_perception(&mut self, event: PerceptionEvent) {
        if let PerceptionStatus::Unavailable(_) = self.status {
            return;
        }

        match event {
            PerceptionEvent::Hand(points, captured_at) => {
                self.status = PerceptionStatus::Active;
                match LandmarkSnapshot::new(&points, captured_at) {
                    Ok(snapshot) => self.on_hand(&snapshot),
                    Err(e) => {
                        debug!(error = %e, "dropping landmark frame");
                        self.on_no_hand();
                    }
                }
            }
            PerceptionEvent::NoHand => {
                self.status = PerceptionStatus::Active;
                self.on_no_hand();
            }
            PerceptionEvent::Unavailable(reason) => {
                let err = IntentError::PerceptionUnavailable(reason.clone());
                warn!(error = %err, "falling back to mouse input");
                self.status = PerceptionStatus::Unavailable(reason);
                self.on_no_hand();
            }
        }
    }

    /// The perception channel hung up.
    pub fn perception_closed(&mut self) {
        self.on_perception(PerceptionEvent::Unavailable("source disconnected".into()));
    }

    fn on_hand(&mut self, snapshot: &LandmarkSnapshot) {
        self.normalizer.update(Some(snapshot));
        let reading = self.classifier.classify(snapshot);
        self.levels = reading.levels;

        if reading.pinch_edge && self.pinch.fire() {
            debug!(event = GestureEvent::PinchTriggered.as_str(), source = "hand", "trigger");
        }
        if reading.palm_edge && self.palm.fire() {
            debug!(event = GestureEvent::PalmTriggered.as_str(), source = "hand", "trigger");
        }
    }

    fn on_no_hand(&mut self) {
        self.normalizer.mark_lost();
        self.levels = GestureLevels::default();
    }

    // ── mouse path ───────────────────────────────────────────────────────

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if self.hand_detected() {
            return;
        }
        self.normalizer.place(x, y);
    }

    pub fn on_pointer_press(&mut self) {
        if self.hand_detected() {
            return;
        }
        if self.pinch.fire() {
            debug!(event = GestureEvent::PinchTriggered.as_str(), source = "mouse", "trigger");
        }
    }

    // ── consumer ─────────────────────────────────────────────────────────

    /// Snapshot the pointer and drain both triggers.
    pub fn take_frame(&mut self) -> InputFrame {
        InputFrame {
            pointer:         *self.normalizer.state(),
            pinch_triggered: self.pinch.take(),
            palm_triggered:  self.palm.take(),
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.normalizer.resize(viewport);
    }

    pub fn pointer(&self)       -> &PointerState     { self.normalizer.state() }
    pub fn levels(&self)        -> GestureLevels     { self.levels }
    pub fn status(&self)        -> &PerceptionStatus { &self.status }
    pub fn hand_detected(&self) -> bool              { self.normalizer.state().hand_detected }
    pub fn viewport(&self)      -> Viewport          { self.normalizer.viewport() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::poses::{hand, Pose};
    use std::time::Duration;

    fn arbitrator() -> InputArbitrator {
        InputArbitrator::new(
            PointerConfig::default(),
            GestureConfig::default(),
            Viewport::new(1000.0, 500.0),
        )
    }

    fn hand_event(pose: Pose, at: Instant) -> PerceptionEvent {
        PerceptionEvent::Hand(hand(0.5, 0.4, pose), at)
    }

    #[test]
    fn mouse_drives_pointer_without_hand() {
        let mut a = arbitrator();
        a.on_pointer_move(250.0, 125.0);
        let f = a.take_frame();
        assert_eq!((f.pointer.x, f.pointer.y), (250.0, 125.0));
        assert_eq!((f.pointer.ndc_x, f.pointer.ndc_y), (-0.5, 0.5));
        assert!(!f.pointer.hand_detected);
    }

    #[test]
    fn mouse_ignored_while_hand_present() {
        let mut a = arbitrator();
        a.on_perception(hand_event(Pose::Relaxed, Instant::now()));
        let before = *a.pointer();
        a.on_pointer_move(1.0, 1.0);
        assert_eq!(*a.pointer(), before);
    }

    #[test]
    fn mouse_press_is_a_pinch_only_without_hand() {
        let mut a = arbitrator();
        a.on_pointer_press();
        assert!(a.take_frame().pinch_triggered);

        a.on_perception(hand_event(Pose::Relaxed, Instant::now()));
        a.on_pointer_press();
        assert!(!a.take_frame().pinch_triggered);
    }

    #[test]
    fn triggers_are_consumed_once() {
        let mut a = arbitrator();
        a.on_perception(hand_event(Pose::Pinch, Instant::now()));
        assert!(a.take_frame().pinch_triggered);
        assert!(!a.take_frame().pinch_triggered);
    }

    #[test]
    fn triggers_survive_until_the_next_tick() {
        // Several perception callbacks between two ticks: the edge from the
        // first one is still delivered, exactly once.
        let t = Instant::now();
        let mut a = arbitrator();
        a.on_perception(hand_event(Pose::Pinch, t));
        a.on_perception(hand_event(Pose::Pinch, t + Duration::from_millis(10)));
        a.on_perception(PerceptionEvent::NoHand);
        let f = a.take_frame();
        assert!(f.pinch_triggered);
        assert!(!f.pointer.hand_detected);
        assert!(!a.take_frame().pinch_triggered);
    }

    #[test]
    fn held_pinch_does_not_refire_after_hand_loss() {
        let t = Instant::now();
        let mut a = arbitrator();
        a.on_perception(hand_event(Pose::Pinch, t));
        assert!(a.take_frame().pinch_triggered);

        a.on_perception(PerceptionEvent::NoHand);
        assert!(!a.take_frame().pinch_triggered);

        // Same pinch, back in view.
        a.on_perception(hand_event(Pose::Pinch, t + Duration::from_millis(50)));
        let f = a.take_frame();
        assert!(f.pointer.hand_detected);
        assert!(!f.pinch_triggered);

        a.on_perception(hand_event(Pose::Relaxed, t + Duration::from_millis(100)));
        a.on_perception(hand_event(Pose::Pinch, t + Duration::from_millis(150)));
        assert!(a.take_frame().pinch_triggered);
    }

    #[test]
    fn palm_has_no_mouse_equivalent() {
        let mut a = arbitrator();
        a.on_pointer_press();
        let f = a.take_frame();
        assert!(!f.palm_triggered);
        assert_eq!(f.events().collect::<Vec<_>>(), vec![GestureEvent::PinchTriggered]);
    }

    #[test]
    fn palm_trigger_from_hand() {
        let mut a = arbitrator();
        a.on_perception(hand_event(Pose::OpenPalm, Instant::now()));
        assert!(a.levels().open_palm);
        assert!(a.take_frame().palm_triggered);
    }

    #[test]
    fn malformed_frame_counts_as_no_hand() {
        let mut a = arbitrator();
        a.on_perception(hand_event(Pose::Relaxed, Instant::now()));
        assert!(a.hand_detected());
        a.on_perception(PerceptionEvent::Hand(vec![Landmark::default(); 5], Instant::now()));
        assert!(!a.hand_detected());
        assert_eq!(*a.status(), PerceptionStatus::Active);
    }

    #[test]
    fn unavailable_is_permanent() {
        let mut a = arbitrator();
        a.on_perception(hand_event(Pose::Relaxed, Instant::now()));
        a.on_perception(PerceptionEvent::Unavailable("camera denied".into()));
        assert!(!a.hand_detected());

        // Late frames are ignored; the mouse keeps working.
        a.on_perception(hand_event(Pose::Pinch, Instant::now()));
        assert!(!a.hand_detected());
        assert!(!a.take_frame().pinch_triggered);
        a.on_pointer_press();
        assert!(a.take_frame().pinch_triggered);
        assert!(matches!(a.status(), PerceptionStatus::Unavailable(r) if r == "camera denied"));
    }

    #[test]
    fn closed_channel_falls_back_to_mouse() {
        let mut a = arbitrator();
        a.perception_closed();
        a.on_pointer_move(10.0, 20.0);
        assert_eq!(a.pointer().x, 10.0);
        assert!(matches!(a.status(), PerceptionStatus::Unavailable(_)));
    }

    #[test]
    fn handoff_to_mouse_snaps() {
        let mut a = arbitrator();
        a.on_perception(hand_event(Pose::Relaxed, Instant::now()));
        a.on_perception(PerceptionEvent::NoHand);
        a.on_pointer_move(0.0, 0.0);
        assert_eq!((a.pointer().x, a.pointer().y), (0.0, 0.0));
    }
}
