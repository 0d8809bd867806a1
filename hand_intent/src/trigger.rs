//! Consume-once trigger slots.
//!
//! A gesture trigger is an impulse, not a level: it is true for exactly one
//! consumer and then gone.  [`Latch::take`] is the only way to observe it,
//! so "at most one delivery" falls out of the type rather than out of a
//! convention to clear a flag after reading it.

/// Edge-triggered interaction events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureEvent {
    /// Thumb and index tips came together (or primary button pressed).
    PinchTriggered,
    /// All four fingers opened above their PIP joints.
    PalmTriggered,
}

impl GestureEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PinchTriggered => "pinch",
            Self::PalmTriggered  => "palm",
        }
    }
}

/// A single-slot, drain-once trigger.
///
/// Firing an already armed latch is a no-op: triggers do not queue.
#[derive(Debug, Default)]
pub struct Latch {
    armed: Option<()>,
}

impl Latch {
    pub fn new() -> Self { Latch { armed: None } }

    /// Arm the latch.  Returns false if it was already armed.
    pub fn fire(&mut self) -> bool {
        self.armed.replace(()).is_none()
    }

    /// Drain the latch.  True at most once per `fire`.
    pub fn take(&mut self) -> bool {
        self.armed.take().is_some()
    }

    pub fn is_armed(&self) -> bool { self.armed.is_some() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_drains_exactly_once() {
        let mut l = Latch::new();
        assert!(!l.take());
        l.fire();
        assert!(l.is_armed());
        assert!(l.take());
        assert!(!l.take());
    }

    #[test]
    fn repeated_fires_do_not_accumulate() {
        let mut l = Latch::new();
        assert!(l.fire());
        assert!(!l.fire());
        assert!(!l.fire());
        assert!(l.take());
        assert!(!l.take());
    }
}
