use crate::model::score::{CategoryScore, ScoreError};

pub const DEFAULT_USEFULNESS_THRESHOLD: f64 = 0.1;

/// Hides scores the model was unsure a review talks about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskPolicy {
    pub threshold: f64,
}

impl Default for MaskPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_USEFULNESS_THRESHOLD,
        }
    }
}

impl MaskPolicy {
    pub fn new(threshold: f64) -> Result<Self, ScoreError> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ScoreError::InvalidInput(format!(
                "usefulness threshold must be within [0, 1], got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    /// A score equal to the threshold is kept.
    pub fn retains(&self, usefulness: f64) -> bool {
        usefulness >= self.threshold
    }

    pub fn apply(&self, score: CategoryScore) -> CategoryScore {
        if self.retains(score.usefulness) {
            score
        } else {
            CategoryScore { score: 0.0, ..score }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/mask.rs"]
mod tests;
