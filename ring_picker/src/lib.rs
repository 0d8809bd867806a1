//! # ring_picker
//!
//! A ring of 64 hexagram cards driven by `hand_intent`: point with the index
//! finger (or the mouse) to hover, pinch to float a card, open the palm to
//! dissolve it.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Point at a card | Highlight it |
//! | Pinch after a short dwell | Float the card to the centre, show its name |
//! | Open palm while a card floats | Dissolve it ("Void Manifested") |
//! | Left click (no hand visible) | Same as pinch |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse position doubles as a
//!   synthetic hand, shaped by the keyboard.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | `H` | Raise / lower the simulated hand |
//! | `P` (hold) | Pinch |
//! | `O` (hold) | Open palm |
//! | `C` | Simulate a camera failure (mouse only from then on) |
//! | `Q` / `Escape` | Quit |

pub mod hexagram;
pub mod perception;
pub mod ring;
pub mod visualizer;
pub mod app;
