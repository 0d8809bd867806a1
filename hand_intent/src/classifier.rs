//! Pinch and open-palm recognition from one landmark snapshot.
//!
//! # Algorithm
//!
//! Each frame is classified from scratch; the only memory is the previous
//! frame's level for edge detection plus the palm cooldown deadline.
//!
//! * **Pinch**: planar thumb-tip ↔ index-tip distance below
//!   `pinch_ratio × hand_scale`, where hand scale is wrist ↔ middle MCP.
//!   Normalizing by the hand keeps the test independent of how far the hand
//!   is from the camera.
//! * **Open palm**: index, middle, ring and pinky tips all above their PIP
//!   joints (smaller `y`).  Four independent tests, all must pass.
//!
//! A rising edge of either level produces an event.  Palm events are also
//! gated by a cooldown so a held open hand that flickers at the threshold
//! cannot fire twice in a row.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::landmark::{HandGeometry, LandmarkSnapshot};

// ════════════════════════════════════════════════════════════════════════════
// Config
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Pinching when distance < `pinch_ratio × hand_scale`.
    pub pinch_ratio:   f32,
    /// Minimum time between two palm events.
    pub palm_cooldown: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            pinch_ratio:   0.35,
            palm_cooldown: Duration::from_millis(1000),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Readings
// ════════════════════════════════════════════════════════════════════════════

/// Level signals for the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureLevels {
    pub pinching:  bool,
    pub open_palm: bool,
}

/// Levels plus the edges they produced this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureReading {
    pub levels:     GestureLevels,
    pub pinch_edge: bool,
    pub palm_edge:  bool,
}

// ── pure posture tests ────────────────────────────────────────────────────

pub fn is_pinching(geo: &HandGeometry, pinch_ratio: f32) -> bool {
    geo.pinch_distance < pinch_ratio * geo.hand_scale
}

pub fn is_open_palm(geo: &HandGeometry) -> bool {
    geo.extended.iter().all(|&e| e)
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct GestureClassifier {
    config:        GestureConfig,
    last:          GestureLevels,
    palm_ready_at: Option<Instant>,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        GestureClassifier { config, last: GestureLevels::default(), palm_ready_at: None }
    }

    /// Classify one snapshot, using its capture time as the clock.
    pub fn classify(&mut self, snapshot: &LandmarkSnapshot) -> GestureReading {
        let geo = HandGeometry::measure(snapshot);
        let levels = GestureLevels {
            pinching:  is_pinching(&geo, self.config.pinch_ratio),
            open_palm: is_open_palm(&geo),
        };

        let pinch_edge = levels.pinching && !self.last.pinching;

        let now = snapshot.captured_at;
        let cooled = self.palm_ready_at.map_or(true, |ready| now > ready);
        let palm_edge = levels.open_palm && !self.last.open_palm && cooled;
        if palm_edge {
            self.palm_ready_at = Some(now + self.config.palm_cooldown);
        } else if levels.open_palm && !self.last.open_palm {
            trace!("palm edge suppressed by cooldown");
        }

        self.last = levels;
        GestureReading { levels, pinch_edge, palm_edge }
    }

    /// Forget edge memory and any pending cooldown.
    pub fn reset(&mut self) {
        self.last = GestureLevels::default();
        self.palm_ready_at = None;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Synthetic poses
// ════════════════════════════════════════════════════════════════════════════

/// Synthetic hands for tests and simulators.
///
/// The hand is upright: wrist at the bottom, fingers pointing up (smaller
/// `y`), hand scale 0.2 in normalized units.  `(x, y)` is where the index
/// fingertip lands.
pub mod poses {
    use crate::landmark::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Pose {
        /// Fingers curled, thumb away from index.
        Relaxed,
        /// Fingers curled, thumb touching index.
        Pinch,
        /// All four fingers extended, thumb out to the side.
        OpenPalm,
    }

    pub fn hand(x: f32, y: f32, pose: Pose) -> Vec<Landmark> {
        let mut p = vec![Landmark::default(); LANDMARK_COUNT];
        let open = pose == Pose::OpenPalm;

        // Extended fingers put the knuckle row 0.14 below the index tip;
        // curled ones fold the tip back down 0.02 below the knuckles.  The
        // wrist is always 0.2 straight below the middle knuckle.
        let knuckle_y = if open { y + 0.14 } else { y - 0.02 };
        let wrist_y = knuckle_y + 0.2;
        p[WRIST] = Landmark::new(x + 0.03, wrist_y, 0.0);

        let fingers = [
            (INDEX_MCP,  0.00f32),
            (MIDDLE_MCP, 0.03),
            (RING_MCP,   0.06),
            (PINKY_MCP,  0.09),
        ];
        for &(mcp, dx) in &fingers {
            let fx = x + dx;
            p[mcp] = Landmark::new(fx, knuckle_y, 0.0);
            if open {
                p[mcp + 1] = Landmark::new(fx, knuckle_y - 0.05, 0.0);
                p[mcp + 2] = Landmark::new(fx, knuckle_y - 0.10, 0.0);
                p[mcp + 3] = Landmark::new(fx, knuckle_y - 0.14, 0.0);
            } else {
                // Curled: PIP up, DIP and tip fold back down below the PIP.
                p[mcp + 1] = Landmark::new(fx, knuckle_y - 0.04, 0.0);
                p[mcp + 2] = Landmark::new(fx, knuckle_y - 0.02, 0.0);
                p[mcp + 3] = Landmark::new(fx, knuckle_y - 0.01, 0.0);
            }
        }
        // Keep the index tip exactly where it was asked for.
        p[INDEX_TIP] = Landmark::new(x, y, 0.0);

        let thumb = match pose {
            Pose::Pinch    => Landmark::new(x - 0.01, y, 0.0),
            Pose::Relaxed  => Landmark::new(x - 0.12, y + 0.04, 0.0),
            Pose::OpenPalm => Landmark::new(x - 0.14, knuckle_y, 0.0),
        };
        p[THUMB_CMC] = Landmark::new(x - 0.04, wrist_y - 0.04, 0.0);
        p[THUMB_MCP] = Landmark::new(x - 0.08, wrist_y - 0.08, 0.0);
        p[THUMB_IP]  = Landmark::new((x - 0.08 + thumb.x) / 2.0, (wrist_y - 0.08 + thumb.y) / 2.0, 0.0);
        p[THUMB_TIP] = thumb;
        p
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
