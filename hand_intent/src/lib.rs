//! # hand_intent
//!
//! Turns a hand-landmark stream (or a mouse) into a pointer plus two
//! debounced triggers, and drives a small selection state machine over a
//! ring of items.
//!
//! ## Pipeline
//!
//! ```text
//! perception ─▶ LandmarkNormalizer ─┐
//!            └▶ GestureClassifier ──┼─▶ InputArbitrator ─▶ InputFrame ─┐
//! mouse ────────────────────────────┘                                  │
//!                                   PickProvider ─▶ InteractionMachine ◀┘
//!                                                          │
//!                                                          ▼
//!                                                   PresentationSink
//! ```
//!
//! | Signal | Source | Effect |
//! |---|---|---|
//! | Index fingertip | Hand | Smoothed pointer, NDC for picking |
//! | Mouse position | Mouse, only without a hand | Raw pointer |
//! | Pinch rising edge | Hand | `PinchTriggered` |
//! | Primary button press | Mouse, only without a hand | `PinchTriggered` |
//! | Open palm rising edge (1 s cooldown) | Hand | `PalmTriggered` |
//!
//! | State | On | Goes to | Command |
//! |---|---|---|---|
//! | Idle | item under pointer | Hovering | `Highlight` |
//! | Hovering | other item / none | Hovering / Idle | `Highlight` / `Clear` |
//! | Hovering | pinch after 0.1 s dwell | Selected | `Float` |
//! | Selected | palm | Dissolving | `Dissolve` |
//! | Dissolving | presentation done | Idle | `Clear` |
//!
//! Everything is single-threaded and owned.  Perception results arrive as
//! [`PerceptionEvent`] messages; the per-tick consumer drains them into the
//! arbitrator, takes one [`InputFrame`] and hands it to the machine.

pub mod error;
pub mod landmark;
pub mod normalizer;
pub mod classifier;
pub mod trigger;
pub mod arbitrator;
pub mod item;
pub mod interaction;
pub mod config;

pub use arbitrator::{InputArbitrator, InputFrame, PerceptionEvent, PerceptionStatus};
pub use classifier::{GestureClassifier, GestureConfig, GestureLevels, GestureReading};
pub use config::IntentConfig;
pub use error::{IntentError, Result};
pub use interaction::{
    Command, InteractionConfig, InteractionMachine, InteractionState, PickProvider,
    PresentationSink,
};
pub use item::{Item, ItemId, ItemRing};
pub use landmark::{HandGeometry, Landmark, LandmarkSnapshot, LANDMARK_COUNT};
pub use normalizer::{LandmarkNormalizer, PointerConfig, PointerState, Viewport};
pub use trigger::{GestureEvent, Latch};
