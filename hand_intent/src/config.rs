//! Aggregate configuration.
//!
//! Plain data with defaults; callers override field by field and run
//! [`IntentConfig::validate`] once before wiring the pipeline.

use crate::arbitrator::InputArbitrator;
use crate::classifier::GestureConfig;
use crate::error::{IntentError, Result};
use crate::interaction::{InteractionConfig, InteractionMachine};
use crate::item::ItemId;
use crate::normalizer::{PointerConfig, Viewport};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IntentConfig {
    pub pointer:     PointerConfig,
    pub gesture:     GestureConfig,
    pub interaction: InteractionConfig,
}

impl IntentConfig {
    pub fn validate(&self) -> Result<()> {
        let s = self.pointer.smoothing;
        if !(s > 0.0 && s <= 1.0) {
            return Err(IntentError::InvalidConfig(format!(
                "smoothing must be in (0, 1], got {}", s
            )));
        }
        let r = self.gesture.pinch_ratio;
        if !(r.is_finite() && r > 0.0) {
            return Err(IntentError::InvalidConfig(format!(
                "pinch ratio must be positive, got {}", r
            )));
        }
        let d = self.interaction.dwell_threshold;
        if !(d.is_finite() && d >= 0.0) {
            return Err(IntentError::InvalidConfig(format!(
                "dwell threshold must be non-negative, got {}", d
            )));
        }
        Ok(())
    }

    /// Validate, then build the two stateful halves of the pipeline.
    pub fn build(
        &self,
        viewport: Viewport,
        items:    impl IntoIterator<Item = ItemId>,
    ) -> Result<(InputArbitrator, InteractionMachine)> {
        self.validate()?;
        validate_viewport(viewport)?;
        Ok((
            InputArbitrator::new(self.pointer, self.gesture, viewport),
            InteractionMachine::new(self.interaction, items),
        ))
    }
}

pub fn validate_viewport(viewport: Viewport) -> Result<()> {
    let ok = |v: f32| v.is_finite() && v > 0.0;
    if ok(viewport.width) && ok(viewport.height) {
        Ok(())
    } else {
        Err(IntentError::InvalidConfig(format!(
            "viewport must be positive, got {}x{}", viewport.width, viewport.height
        )))
    }
}
