//! Hand landmarks and the geometry derived from one snapshot.
//!
//! Coordinates follow the usual 21-point hand model: `x` and `y` are
//! normalized to the camera image (0.0–1.0, `y` grows downward) and `z` is
//! relative depth.  A snapshot is validated once on construction; everything
//! downstream can index it without bounds checks failing.

use std::time::Instant;

use crate::error::{IntentError, Result};

// ════════════════════════════════════════════════════════════════════════════
// Anatomical indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// (tip, PIP) for index, middle, ring and pinky, in that order.
pub const FINGER_TIP_PIP: [(usize, usize); 4] = [
    (INDEX_TIP,  INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP,   RING_PIP),
    (PINKY_TIP,  PINKY_PIP),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Planar distance; depth is too noisy to classify on.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSnapshot
// ════════════════════════════════════════════════════════════════════════════

/// One validated perception frame for a single hand.
#[derive(Clone, Debug)]
pub struct LandmarkSnapshot {
    points:          [Landmark; LANDMARK_COUNT],
    pub captured_at: Instant,
}

impl LandmarkSnapshot {
    /// Validate raw perception output.
    ///
    /// Fewer than 21 points, or any NaN/infinite coordinate, is rejected.
    /// Points past the 21st are ignored.
    pub fn new(points: &[Landmark], captured_at: Instant) -> Result<Self> {
        if points.len() < LANDMARK_COUNT {
            return Err(IntentError::MalformedLandmarkSnapshot {
                expected: LANDMARK_COUNT,
                got:      points.len(),
                reason:   "too few landmarks".into(),
            });
        }
        if let Some(bad) = points[..LANDMARK_COUNT].iter().position(|p| !p.is_finite()) {
            return Err(IntentError::MalformedLandmarkSnapshot {
                expected: LANDMARK_COUNT,
                got:      points.len(),
                reason:   format!("non-finite coordinate at landmark {}", bad),
            });
        }

        let mut fixed = [Landmark::default(); LANDMARK_COUNT];
        fixed.copy_from_slice(&points[..LANDMARK_COUNT]);
        Ok(LandmarkSnapshot { points: fixed, captured_at })
    }

    pub(crate) fn get(&self, index: usize) -> &Landmark { &self.points[index] }
    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] { &self.points }
    pub fn index_tip(&self) -> &Landmark { &self.points[INDEX_TIP] }
    pub fn thumb_tip(&self) -> &Landmark { &self.points[THUMB_TIP] }

    /// Uniformly scale every coordinate about the origin.
    pub fn scaled(&self, factor: f32) -> Self {
        let mut points = self.points;
        for p in &mut points {
            p.x *= factor;
            p.y *= factor;
            p.z *= factor;
        }
        LandmarkSnapshot { points, captured_at: self.captured_at }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandGeometry
// ════════════════════════════════════════════════════════════════════════════

/// Scalar measurements for one snapshot.  Recomputed every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandGeometry {
    pub index_tip:      Landmark,
    pub thumb_tip:      Landmark,
    pub pinch_distance: f32,
    /// Wrist to middle-finger knuckle; the hand-size reference.
    pub hand_scale:     f32,
    /// Index, middle, ring, pinky: tip above its PIP joint.
    pub extended:       [bool; 4],
}

impl HandGeometry {
    pub fn measure(snapshot: &LandmarkSnapshot) -> Self {
        let index_tip = *snapshot.index_tip();
        let thumb_tip = *snapshot.thumb_tip();
        let hand_scale = snapshot.get(WRIST).planar_distance(snapshot.get(MIDDLE_MCP));

        let mut extended = [false; 4];
        for (flag, &(tip, pip)) in extended.iter_mut().zip(FINGER_TIP_PIP.iter()) {
            *flag = snapshot.get(tip).y < snapshot.get(pip).y;
        }

        HandGeometry {
            index_tip,
            thumb_tip,
            pinch_distance: index_tip.planar_distance(&thumb_tip),
            hand_scale,
            extended,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
