//! Sample-and-render loop.
//!
//! Every trigger draws a fresh review, masks low-usefulness categories and
//! replaces the payload on display. A failed trigger leaves the previous
//! state in place.

use serde::Serialize;
use tracing::debug;

use crate::input::{Dataset, LabelledReview};
use crate::model::category::Category;
use crate::model::mask::MaskPolicy;
use crate::pipeline::sample::{SampleError, Sampler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Initial,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    pub category: Category,
    pub score: f64,
    pub masked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPayload {
    pub text: String,
    /// Always one bar per category, in category order.
    pub bars: Vec<Bar>,
}

pub fn build_payload(review: &LabelledReview, policy: &MaskPolicy) -> DisplayPayload {
    let bars = review
        .scores
        .iter()
        .map(|&raw| {
            let shown = policy.apply(raw);
            Bar {
                category: shown.category,
                score: shown.score,
                masked: !policy.retains(raw.usefulness),
            }
        })
        .collect();
    DisplayPayload {
        text: review.text.clone(),
        bars,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Displayed(DisplayPayload),
}

pub struct ReviewView<'a, R = rand_chacha::ChaCha8Rng> {
    dataset: &'a Dataset,
    sampler: Sampler<R>,
    policy: MaskPolicy,
    state: ViewState,
}

impl<'a, R: rand::Rng> ReviewView<'a, R> {
    pub fn new(dataset: &'a Dataset, sampler: Sampler<R>, policy: MaskPolicy) -> Self {
        Self {
            dataset,
            sampler,
            policy,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn policy(&self) -> &MaskPolicy {
        &self.policy
    }

    pub fn handle(&mut self, trigger: Trigger) -> Result<DisplayPayload, SampleError> {
        let review = self.sampler.sample(self.dataset)?;
        let payload = build_payload(review, &self.policy);
        debug!(
            ?trigger,
            masked = payload.bars.iter().filter(|b| b.masked).count(),
            "rendered review"
        );
        self.state = ViewState::Displayed(payload.clone());
        Ok(payload)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/view.rs"]
mod tests;
