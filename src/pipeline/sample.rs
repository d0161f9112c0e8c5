use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::input::{Dataset, LabelledReview};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("empty dataset: there are no reviews to sample")]
    EmptyDataset,
}

/// Uniform record picker. Seeded samplers replay the same sequence.
#[derive(Debug, Clone)]
pub struct Sampler<R = ChaCha8Rng> {
    rng: R,
}

impl Sampler<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> Sampler<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn sample<'a>(&mut self, dataset: &'a Dataset) -> Result<&'a LabelledReview, SampleError> {
        if dataset.is_empty() {
            return Err(SampleError::EmptyDataset);
        }
        let idx = self.rng.gen_range(0..dataset.len());
        dataset.get(idx).ok_or(SampleError::EmptyDataset)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/sample.rs"]
mod tests;
