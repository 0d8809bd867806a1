//! Error taxonomy for the intent pipeline.
//!
//! Nothing here is fatal.  Each component that detects one of these absorbs
//! it locally: the arbitrator falls back to mouse input, the interaction
//! machine falls back to `Idle`.

use thiserror::Error;

use crate::item::ItemId;

/// Every failure the pipeline knows how to recover from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntentError {
    /// Camera or hand model failed to start, or the source went away.
    #[error("perception unavailable: {0}")]
    PerceptionUnavailable(String),

    /// The pick provider named an item the machine was never told about.
    #[error("pick provider returned unknown item {0}")]
    InvalidPickResult(ItemId),

    /// A landmark frame that cannot be classified.
    #[error("malformed landmark snapshot ({got} of {expected} landmarks): {reason}")]
    MalformedLandmarkSnapshot {
        expected: usize,
        got:      usize,
        reason:   String,
    },

    /// The pick provider itself failed.
    #[error("pick failed: {0}")]
    Pick(String),

    /// The presentation sink rejected a command.
    #[error("presentation rejected {command}: {reason}")]
    Presentation {
        command: String,
        reason:  String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, IntentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_culprit() {
        let e = IntentError::InvalidPickResult(ItemId(42));
        assert!(e.to_string().contains("42"));

        let e = IntentError::MalformedLandmarkSnapshot {
            expected: 21,
            got:      3,
            reason:   "too few landmarks".into(),
        };
        assert_eq!(
            e.to_string(),
            "malformed landmark snapshot (3 of 21 landmarks): too few landmarks"
        );
    }
}
