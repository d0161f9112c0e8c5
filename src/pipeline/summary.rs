use serde::Serialize;

use crate::input::Dataset;
use crate::model::category::{Category, category_order};
use crate::model::mask::MaskPolicy;
use crate::pipeline::sample::SampleError;
use crate::report::{median, p90};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub retained: usize,
    pub retained_fraction: f64,
    /// Over retained reviews only; `None` when nothing was retained.
    pub score_median: Option<f64>,
    pub score_p90: Option<f64>,
    pub usefulness_median: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub reviews: usize,
    pub threshold: f64,
    pub categories: Vec<CategorySummary>,
}

pub fn summarize(dataset: &Dataset, policy: &MaskPolicy) -> Result<DatasetSummary, SampleError> {
    if dataset.is_empty() {
        return Err(SampleError::EmptyDataset);
    }
    let n = dataset.len();

    let categories = category_order()
        .iter()
        .map(|&category| {
            let mut retained_scores = Vec::new();
            let mut usefulness = Vec::with_capacity(n);
            for review in dataset.iter() {
                let slot = review.score(category);
                usefulness.push(slot.usefulness);
                if policy.retains(slot.usefulness) {
                    retained_scores.push(slot.score);
                }
            }
            let retained = retained_scores.len();
            let has_scores = !retained_scores.is_empty();
            CategorySummary {
                category,
                retained,
                retained_fraction: retained as f64 / n as f64,
                score_median: has_scores.then(|| median(&retained_scores)),
                score_p90: has_scores.then(|| p90(&retained_scores)),
                usefulness_median: median(&usefulness),
            }
        })
        .collect();

    Ok(DatasetSummary {
        reviews: n,
        threshold: policy.threshold,
        categories,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/summary.rs"]
mod tests;
