//! Landmark → screen pointer.
//!
//! The index fingertip is mirrored, projected into screen pixels and chased
//! with an exponential filter.  NDC is never filtered on its own; it is
//! recomputed from the smoothed screen position every time so the two can
//! not drift apart.

use crate::landmark::LandmarkSnapshot;

// ════════════════════════════════════════════════════════════════════════════
// Viewport
// ════════════════════════════════════════════════════════════════════════════

/// Screen size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width:  f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }

    pub fn centre(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Screen pixels → normalized device coordinates (`y` up).
    pub fn ndc(&self, x: f32, y: f32) -> (f32, f32) {
        ((x / self.width) * 2.0 - 1.0, -(y / self.height) * 2.0 + 1.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PointerState
// ════════════════════════════════════════════════════════════════════════════

/// The one authoritative pointer for a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub x:             f32,
    pub y:             f32,
    pub ndc_x:         f32,
    pub ndc_y:         f32,
    pub hand_detected: bool,
}

impl PointerState {
    pub fn centred(viewport: Viewport) -> Self {
        let (x, y) = viewport.centre();
        let (ndc_x, ndc_y) = viewport.ndc(x, y);
        PointerState { x, y, ndc_x, ndc_y, hand_detected: false }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PointerConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerConfig {
    /// Exponential smoothing factor α in (0, 1]; 1.0 disables smoothing.
    pub smoothing: f32,
    /// Flip the perception x axis so the pointer moves like a mirror.
    pub mirror_x:  bool,
}

impl Default for PointerConfig {
    fn default() -> Self {
        PointerConfig { smoothing: 0.25, mirror_x: true }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkNormalizer
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct LandmarkNormalizer {
    config:   PointerConfig,
    viewport: Viewport,
    state:    PointerState,
}

/// One exponential smoothing step: move `alpha` of the way toward `target`.
///
/// The result is clamped to `[current, target]` so float rounding can never
/// carry it past the target.
pub fn smooth_step(current: f32, target: f32, alpha: f32) -> f32 {
    let next = current + (target - current) * alpha;
    if target >= current {
        next.clamp(current, target)
    } else {
        next.clamp(target, current)
    }
}

impl LandmarkNormalizer {
    pub fn new(config: PointerConfig, viewport: Viewport) -> Self {
        LandmarkNormalizer { config, viewport, state: PointerState::centred(viewport) }
    }

    pub fn state(&self) -> &PointerState { &self.state }
    pub fn viewport(&self) -> Viewport { self.viewport }

    /// Feed one perception result.  `None` means "no hand this frame":
    /// detection drops immediately and the pointer stays where it was.
    pub fn update(&mut self, snapshot: Option<&LandmarkSnapshot>) -> &PointerState {
        let Some(snapshot) = snapshot else {
            self.mark_lost();
            return &self.state;
        };

        let (tx, ty) = self.project(snapshot);
        let alpha = self.config.smoothing;
        self.state.x = smooth_step(self.state.x, tx, alpha);
        self.state.y = smooth_step(self.state.y, ty, alpha);
        self.state.hand_detected = true;
        self.refresh_ndc();
        &self.state
    }

    /// Raw placement from the mouse path.  No smoothing.
    pub fn place(&mut self, x: f32, y: f32) {
        self.state.x = x;
        self.state.y = y;
        self.refresh_ndc();
    }

    pub fn mark_lost(&mut self) {
        self.state.hand_detected = false;
    }

    /// The screen position is kept; NDC follows the new size.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.refresh_ndc();
    }

    /// Index fingertip in screen pixels, before smoothing.
    pub fn project(&self, snapshot: &LandmarkSnapshot) -> (f32, f32) {
        let tip = snapshot.index_tip();
        let u = if self.config.mirror_x { 1.0 - tip.x } else { tip.x };
        (u * self.viewport.width, tip.y * self.viewport.height)
    }

    fn refresh_ndc(&mut self) {
        let (nx, ny) = self.viewport.ndc(self.state.x, self.state.y);
        self.state.ndc_x = nx;
        self.state.ndc_y = ny;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, INDEX_TIP, LANDMARK_COUNT};
    use std::time::Instant;

    const VP: Viewport = Viewport { width: 800.0, height: 600.0 };

    fn tip_at(x: f32, y: f32) -> LandmarkSnapshot {
        let mut pts = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        pts[INDEX_TIP] = Landmark::new(x, y, 0.0);
        LandmarkSnapshot::new(&pts, Instant::now()).unwrap()
    }

    #[test]
    fn starts_centred_without_hand() {
        let n = LandmarkNormalizer::new(PointerConfig::default(), VP);
        assert_eq!(n.state().x, 400.0);
        assert_eq!(n.state().y, 300.0);
        assert_eq!((n.state().ndc_x, n.state().ndc_y), (0.0, 0.0));
        assert!(!n.state().hand_detected);
    }

    #[test]
    fn mirrors_and_smooths_a_quarter_of_the_way() {
        let mut n = LandmarkNormalizer::new(PointerConfig::default(), VP);
        // x = 0.0 mirrors to the right edge (800), y = 0.0 is the top edge.
        n.update(Some(&tip_at(0.0, 0.0)));
        assert_eq!(n.state().x, 400.0 + (800.0 - 400.0) * 0.25);
        assert_eq!(n.state().y, 300.0 - 300.0 * 0.25);
        assert!(n.state().hand_detected);
    }

    #[test]
    fn mirror_can_be_disabled() {
        let cfg = PointerConfig { smoothing: 1.0, mirror_x: false };
        let mut n = LandmarkNormalizer::new(cfg, VP);
        n.update(Some(&tip_at(0.25, 0.5)));
        assert_eq!(n.state().x, 200.0);
    }

    #[test]
    fn converges_on_a_still_target() {
        let mut n = LandmarkNormalizer::new(PointerConfig::default(), VP);
        let snap = tip_at(0.9, 0.1);
        for _ in 0..200 { n.update(Some(&snap)); }
        assert!((n.state().x - 80.0).abs() < 1e-2);
        assert!((n.state().y - 60.0).abs() < 1e-2);
    }

    #[test]
    fn ndc_follows_smoothed_position() {
        let mut n = LandmarkNormalizer::new(PointerConfig::default(), VP);
        n.update(Some(&tip_at(0.3, 0.7)));
        let s = *n.state();
        assert_eq!((s.ndc_x, s.ndc_y), VP.ndc(s.x, s.y));
    }

    #[test]
    fn loss_is_immediate_and_keeps_position() {
        let mut n = LandmarkNormalizer::new(PointerConfig::default(), VP);
        n.update(Some(&tip_at(0.3, 0.7)));
        let before = *n.state();
        n.update(None);
        assert!(!n.state().hand_detected);
        assert_eq!(n.state().x, before.x);
        assert_eq!(n.state().ndc_y, before.ndc_y);
    }

    #[test]
    fn place_is_raw() {
        let mut n = LandmarkNormalizer::new(PointerConfig::default(), VP);
        n.place(0.0, 600.0);
        assert_eq!((n.state().ndc_x, n.state().ndc_y), (-1.0, -1.0));
    }

    #[test]
    fn resize_recomputes_ndc_only() {
        let mut n = LandmarkNormalizer::new(PointerConfig::default(), VP);
        n.place(400.0, 300.0);
        n.resize(Viewport::new(1600.0, 600.0));
        assert_eq!(n.state().x, 400.0);
        assert_eq!(n.state().ndc_x, -0.5);
    }
}
