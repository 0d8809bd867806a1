//! The hover → select → dissolve state machine.
//!
//! ```text
//!            pick = A                     pinch, dwell > threshold
//!   Idle ─────────────────▶ Hovering(A) ─────────────────────────▶ Selected(A)
//!    ▲  ◀─────────────────   │    ▲                                    │
//!    │      pick = none      │    │ pick = B (dwell reset)             │ palm
//!    │                       └────┘                                    ▼
//!    └──────────────────── dissolve complete ────────────────── Dissolving(A)
//! ```
//!
//! The machine is purely reactive.  Time only enters through the caller's
//! per-tick `dt`, which feeds the dwell accumulator.  Every entry into
//! `Hovering`, `Selected` or `Dissolving` produces exactly one command for
//! the presentation; entering `Idle` produces `Clear`.
//!
//! While `Selected` or `Dissolving` the pick provider is not consulted at
//! all.  Any collaborator failure (unknown item, pick error, presentation
//! error) is logged and resolves to `Idle`.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};

use crate::arbitrator::InputFrame;
use crate::error::{IntentError, Result};
use crate::item::ItemId;

// ════════════════════════════════════════════════════════════════════════════
// Config
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionConfig {
    /// Seconds an item must stay hovered before a pinch may select it.
    pub dwell_threshold: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        InteractionConfig { dwell_threshold: 0.1 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// State and commands
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionState {
    Idle,
    Hovering { item: ItemId, dwell: f32 },
    /// Floating in front of the ring, exclusively focused.
    Selected { item: ItemId },
    Dissolving { item: ItemId },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle              => "idle",
            Self::Hovering { .. }   => "hovering",
            Self::Selected { .. }   => "selected",
            Self::Dissolving { .. } => "dissolving",
        }
    }
}

/// Instructions for the presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Highlight(ItemId),
    Float(ItemId),
    Dissolve(ItemId),
    Clear,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Highlight(id) => write!(f, "highlight {}", id),
            Command::Float(id)     => write!(f, "float {}", id),
            Command::Dissolve(id)  => write!(f, "dissolve {}", id),
            Command::Clear         => write!(f, "clear"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Collaborators
// ════════════════════════════════════════════════════════════════════════════

/// Owns the scene; answers "what is under this point?".
pub trait PickProvider {
    fn pick(&mut self, ndc_x: f32, ndc_y: f32) -> Result<Option<ItemId>>;
}

/// Renders whatever the machine decides.
pub trait PresentationSink {
    fn present(&mut self, command: &Command) -> Result<()>;
}

// ════════════════════════════════════════════════════════════════════════════
// InteractionMachine
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct InteractionMachine {
    config: InteractionConfig,
    known:  BTreeSet<ItemId>,
    state:  InteractionState,
}

impl InteractionMachine {
    pub fn new(config: InteractionConfig, known: impl IntoIterator<Item = ItemId>) -> Self {
        InteractionMachine {
            config,
            known: known.into_iter().collect(),
            state: InteractionState::Idle,
        }
    }

    pub fn state(&self) -> InteractionState { self.state }

    pub fn hovered(&self) -> Option<ItemId> {
        match self.state {
            InteractionState::Hovering { item, .. } => Some(item),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<ItemId> {
        match self.state {
            InteractionState::Selected { item } => Some(item),
            _ => None,
        }
    }

    /// Pick queries are only meaningful while nothing is focused.
    pub fn wants_pick(&self) -> bool {
        matches!(self.state, InteractionState::Idle | InteractionState::Hovering { .. })
    }

    /// Advance one tick given what is under the pointer.
    ///
    /// Returns at most one command.  An unknown `pick` forces `Idle` and is
    /// returned as [`IntentError::InvalidPickResult`]; the caller owns
    /// telling the presentation (see [`tick`](Self::tick)).
    pub fn apply(
        &mut self,
        frame: &InputFrame,
        pick:  Option<ItemId>,
        dt:    f32,
    ) -> Result<Option<Command>> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let command = match self.state {
            InteractionState::Idle | InteractionState::Hovering { .. } => {
                if let Some(id) = pick.filter(|id| !self.known.contains(id)) {
                    self.enter(InteractionState::Idle);
                    return Err(IntentError::InvalidPickResult(id));
                }
                match self.hover(pick, dt) {
                    Some(cmd) => Some(cmd),
                    None => self.try_select(frame),
                }
            }

            InteractionState::Selected { item } => {
                if frame.palm_triggered {
                    self.enter(InteractionState::Dissolving { item });
                    Some(Command::Dissolve(item))
                } else {
                    None
                }
            }

            InteractionState::Dissolving { .. } => None,
        };

        if frame.palm_triggered && !matches!(command, Some(Command::Dissolve(_))) {
            debug!(state = self.state.name(), "palm ignored");
        }
        Ok(command)
    }

    /// Update hover and dwell.  Returns a command only on a hover change.
    fn hover(&mut self, pick: Option<ItemId>, dt: f32) -> Option<Command> {
        match (self.state, pick) {
            (InteractionState::Idle, None) => None,

            (InteractionState::Hovering { item, dwell }, Some(id)) if id == item => {
                self.state = InteractionState::Hovering { item, dwell: dwell + dt };
                None
            }

            (_, Some(id)) => {
                self.enter(InteractionState::Hovering { item: id, dwell: 0.0 });
                Some(Command::Highlight(id))
            }

            (_, None) => {
                self.enter(InteractionState::Idle);
                Some(Command::Clear)
            }
        }
    }

    fn try_select(&mut self, frame: &InputFrame) -> Option<Command> {
        if !frame.pinch_triggered {
            return None;
        }
        match self.state {
            InteractionState::Hovering { item, dwell } if dwell > self.config.dwell_threshold => {
                self.enter(InteractionState::Selected { item });
                Some(Command::Float(item))
            }
            state => {
                debug!(state = state.name(), "pinch ignored");
                None
            }
        }
    }

    /// One full tick against live collaborators.
    ///
    /// The pick provider is queried only when [`wants_pick`](Self::wants_pick).
    /// Returns the command that reached the presentation, if any.
    pub fn tick(
        &mut self,
        frame:  &InputFrame,
        dt:     f32,
        picker: &mut dyn PickProvider,
        sink:   &mut dyn PresentationSink,
    ) -> Option<Command> {
        let before = self.state;

        let pick = if self.wants_pick() {
            match picker.pick(frame.pointer.ndc_x, frame.pointer.ndc_y) {
                Ok(pick) => pick,
                Err(e) => return self.recover(before, e, sink),
            }
        } else {
            None
        };

        let command = match self.apply(frame, pick, dt) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => return None,
            Err(e) => return self.recover(before, e, sink),
        };

        match sink.present(&command) {
            Ok(()) => Some(command),
            Err(e) => self.recover(before, e, sink),
        }
    }

    /// The presentation finished dissolving `id`.
    pub fn dissolve_complete(
        &mut self,
        id:   ItemId,
        sink: &mut dyn PresentationSink,
    ) -> Option<Command> {
        match self.state {
            InteractionState::Dissolving { item } if item == id => {
                self.enter(InteractionState::Idle);
                if let Err(e) = sink.present(&Command::Clear) {
                    warn!(error = %e, "clear after dissolve failed");
                }
                Some(Command::Clear)
            }
            state => {
                debug!(item = %id, state = state.name(), "stale dissolve completion");
                None
            }
        }
    }

    /// Drop any hover or selection.
    pub fn reset(&mut self, sink: &mut dyn PresentationSink) -> Option<Command> {
        if self.state == InteractionState::Idle {
            return None;
        }
        self.enter(InteractionState::Idle);
        if let Err(e) = sink.present(&Command::Clear) {
            warn!(error = %e, "clear on reset failed");
        }
        Some(Command::Clear)
    }

    fn recover(
        &mut self,
        before: InteractionState,
        err:    IntentError,
        sink:   &mut dyn PresentationSink,
    ) -> Option<Command> {
        warn!(error = %err, state = self.state.name(), "interaction reset to idle");
        let touched = before != InteractionState::Idle || self.state != InteractionState::Idle;
        self.enter(InteractionState::Idle);
        if !touched {
            return None;
        }
        if let Err(e) = sink.present(&Command::Clear) {
            warn!(error = %e, "clear during recovery failed");
        }
        Some(Command::Clear)
    }

    fn enter(&mut self, next: InteractionState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "transition");
        }
        self.state = next;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
