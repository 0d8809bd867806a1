//! Hand perception — from LeapMotion hardware or the keyboard/mouse simulator.
//!
//! The public interface is [`PerceptionEvent`] delivered over a `mpsc`
//! channel.  The application drains the channel once per frame; it does not
//! care whether a hand came from real hardware or from the simulator.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Instant;

use hand_intent::classifier::poses::{self, Pose};
use hand_intent::PerceptionEvent;
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`PerceptionEvent`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<PerceptionEvent>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<PerceptionEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// The device looks up at a flat hand, so joints are projected onto the
/// horizontal x/z plane: fingers pointing away from the user read as
/// "up" in landmark space.  The x axis is pre-flipped so the pointer's
/// default mirroring comes out the right way round.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<PerceptionEvent>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                let _ = tx.send(PerceptionEvent::Unavailable(format!("LeapC connection: {:?}", e)));
                return;
            }
        };
        if let Err(e) = connection.open() {
            let _ = tx.send(PerceptionEvent::Unavailable(format!("LeapMotion device: {:?}", e)));
            return;
        }

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let event = match frame.hands().next() {
                    Some(hand) => PerceptionEvent::Hand(leap_landmarks(&hand), Instant::now()),
                    None       => PerceptionEvent::NoHand,
                };
                if tx.send(event).is_err() { return; }
            }
        }
    }
}

/// Millimetres of device space mapped onto one landmark unit.
#[cfg(feature = "leap")]
const LEAP_SPAN_MM: f32 = 300.0;

#[cfg(feature = "leap")]
fn leap_point(x: f32, y: f32, z: f32) -> hand_intent::Landmark {
    hand_intent::Landmark::new(0.5 - x / LEAP_SPAN_MM, 0.5 + z / LEAP_SPAN_MM, y / LEAP_SPAN_MM)
}

/// Wrist, then four joints per digit from thumb to pinky.
#[cfg(feature = "leap")]
fn leap_landmarks(hand: &leaprs::Hand) -> Vec<hand_intent::Landmark> {
    let digits: Vec<_> = hand.digits().collect();
    let mut points = Vec::with_capacity(hand_intent::LANDMARK_COUNT);
    if let Some(middle) = digits.get(2) {
        let w = middle.metacarpal().prev_joint();
        points.push(leap_point(w.x, w.y, w.z));
    }
    for digit in &digits {
        let joints = [
            digit.proximal().prev_joint(),
            digit.intermediate().prev_joint(),
            digit.distal().prev_joint(),
            digit.distal().next_joint(),
        ];
        points.extend(joints.iter().map(|j| leap_point(j.x, j.y, j.z)));
    }
    points
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// A simulated hand with its index fingertip under the screen point,
    /// given as fractions of the window size.
    HandAt { u: f32, v: f32, pose: Pose },
    HandLost,
    /// Pretend the camera died.
    CameraFailed,
    Quit,
}

/// Landmark source driven by [`SimInput`] events from the window.
///
/// Screen fractions are mapped back into perception space, undoing the
/// pointer's mirroring, so the smoothed pointer lands where the mouse is.
pub struct SimLandmarkSource {
    pub rx:       Receiver<SimInput>,
    pub mirror_x: bool,
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<PerceptionEvent>) {
        for input in &self.rx {
            let event = match input {
                SimInput::HandAt { u, v, pose } => {
                    let u = if self.mirror_x { 1.0 - u } else { u };
                    PerceptionEvent::Hand(poses::hand(u, v, pose), Instant::now())
                }
                SimInput::HandLost => PerceptionEvent::NoHand,
                SimInput::CameraFailed => {
                    debug!("simulated camera failure");
                    let _ = tx.send(PerceptionEvent::Unavailable("simulated camera failure".into()));
                    return;
                }
                SimInput::Quit => return,
            };
            if tx.send(event).is_err() { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_intent::LandmarkSnapshot;

    fn sim(mirror_x: bool) -> (Sender<SimInput>, Receiver<PerceptionEvent>) {
        let (tx, rx) = mpsc::channel();
        let source = SimLandmarkSource { rx, mirror_x };
        (tx, spawn_landmark_source(source))
    }

    #[test]
    fn hand_at_becomes_a_full_snapshot() {
        let (tx, rx) = sim(true);
        tx.send(SimInput::HandAt { u: 0.25, v: 0.25, pose: Pose::Pinch }).unwrap();
        drop(tx);

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events.len(), 1);
        let PerceptionEvent::Hand(points, at) = &events[0] else { panic!("{:?}", events[0]) };
        let snap = LandmarkSnapshot::new(points, *at).unwrap();
        // Mirrored back into camera space.
        assert!((snap.index_tip().x - 0.75).abs() < 1e-6);
        assert!((snap.index_tip().y - 0.25).abs() < 1e-6);
    }

    #[test]
    fn unmirrored_maps_straight_through() {
        let (tx, rx) = sim(false);
        tx.send(SimInput::HandAt { u: 0.25, v: 0.0, pose: Pose::Relaxed }).unwrap();
        drop(tx);
        let PerceptionEvent::Hand(points, _) = rx.recv().unwrap() else { panic!() };
        assert!((points[hand_intent::landmark::INDEX_TIP].x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn hand_lost_is_no_hand() {
        let (tx, rx) = sim(true);
        tx.send(SimInput::HandLost).unwrap();
        drop(tx);
        assert_eq!(rx.recv().unwrap(), PerceptionEvent::NoHand);
    }

    #[test]
    fn camera_failure_ends_the_stream() {
        let (tx, rx) = sim(true);
        tx.send(SimInput::CameraFailed).unwrap();
        let _ = tx.send(SimInput::HandLost);
        assert!(matches!(rx.recv().unwrap(), PerceptionEvent::Unavailable(_)));
        assert!(rx.recv().is_err());
    }

    #[test]
    fn quit_closes_the_channel() {
        let (tx, rx) = sim(true);
        tx.send(SimInput::Quit).unwrap();
        assert!(rx.recv().is_err());
    }
}
