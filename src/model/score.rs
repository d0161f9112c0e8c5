//! Rating-token scoring.
//!
//! The language model answers each category with one token out of
//! `1`..`5` or `NOT`. The six token signals collapse into a probability
//! weighted mean rating (`score`) and the share of mass spent on a real
//! rating rather than `NOT` (`usefulness`).

use serde::Serialize;
use thiserror::Error;

use crate::model::category::Category;

/// Number of rating classes (`1`..`5`), excluding `NOT`.
pub const RATING_CLASSES: usize = 5;
/// Rating classes plus the trailing `NOT` class.
pub const SIGNAL_LEN: usize = RATING_CLASSES + 1;

/// Answer tokens in signal order.
pub const SIGNAL_TOKENS: [&str; SIGNAL_LEN] = ["1", "2", "3", "4", "5", "NOT"];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Logits,
    Probabilities,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingEstimate {
    pub score: f64,
    pub usefulness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: f64,
    pub usefulness: f64,
}

pub fn estimate(values: &[f64], kind: SignalKind) -> Result<RatingEstimate, ScoreError> {
    match kind {
        SignalKind::Logits => estimate_from_logits(values),
        SignalKind::Probabilities => estimate_from_probabilities(values),
    }
}

/// Scores logits `[l1, l2, l3, l4, l5, l_not]`.
pub fn estimate_from_logits(logits: &[f64]) -> Result<RatingEstimate, ScoreError> {
    check_shape(logits)?;
    let (ratings, not) = logits.split_at(RATING_CLASSES);

    let max = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut mass = 0.0;
    let mut weighted = 0.0;
    for (idx, &l) in ratings.iter().enumerate() {
        let e = (l - max).exp();
        mass += e;
        weighted += rating_value(idx) * e;
    }
    // mass >= 1: the max term contributes exp(0).
    let score = weighted / mass;

    let log_rating_mass = max + mass.ln();
    let usefulness = logistic(log_rating_mass - not[0]);

    Ok(RatingEstimate { score, usefulness })
}

/// Scores probabilities `[p1, p2, p3, p4, p5, p_not]`. They need not be
/// normalized; only ratios are used.
pub fn estimate_from_probabilities(probs: &[f64]) -> Result<RatingEstimate, ScoreError> {
    check_shape(probs)?;
    if let Some(p) = probs.iter().find(|p| **p < 0.0) {
        return Err(ScoreError::InvalidInput(format!(
            "probabilities must be non-negative, got {p}"
        )));
    }
    let (ratings, not) = probs.split_at(RATING_CLASSES);

    let mass: f64 = ratings.iter().sum();
    let total = mass + not[0];
    if total <= 0.0 {
        return Err(ScoreError::InvalidInput(
            "all six probabilities are zero".to_string(),
        ));
    }
    if mass <= 0.0 {
        return Ok(RatingEstimate {
            score: 0.0,
            usefulness: 0.0,
        });
    }

    let weighted: f64 = ratings
        .iter()
        .enumerate()
        .map(|(idx, &p)| rating_value(idx) * p)
        .sum();

    Ok(RatingEstimate {
        score: weighted / mass,
        usefulness: mass / total,
    })
}

fn check_shape(values: &[f64]) -> Result<(), ScoreError> {
    if values.len() != SIGNAL_LEN {
        return Err(ScoreError::InvalidInput(format!(
            "expected {SIGNAL_LEN} values (ratings 1-5 and NOT), got {}",
            values.len()
        )));
    }
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(ScoreError::InvalidInput(format!(
            "values must be finite, got {v}"
        )));
    }
    Ok(())
}

fn rating_value(idx: usize) -> f64 {
    (idx + 1) as f64
}

fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/score.rs"]
mod tests;
