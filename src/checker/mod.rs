//! Best-result selection over multi-validator output.
//!
//! When an input is validated with every candidate validator, the checker
//! picks the winner by a weighted score with a flat bonus for validity.
//! Ties keep the earliest result, which — because candidate lists come
//! back in registry priority order — makes selection reproducible.

use crate::validator::DomainValidationResult;

/// Weight of the confidence score in the selection formula.
pub const CONFIDENCE_WEIGHT: f64 = 0.6;
/// Weight of the likelihood score in the selection formula.
pub const LIKELIHOOD_WEIGHT: f64 = 0.4;
/// Flat bonus for valid results, so any valid result outranks any
/// invalid one.
pub const VALID_BONUS: f64 = 1.0;

/// Selection score for one result.
#[must_use]
pub fn selection_score(result: &DomainValidationResult) -> f64 {
    let mut score = CONFIDENCE_WEIGHT * result.confidence + LIKELIHOOD_WEIGHT * result.likelihood;
    if result.valid {
        score += VALID_BONUS;
    }
    score
}

/// Picks the best result by [`selection_score`], stable on ties
/// (first-produced result wins).
#[must_use]
pub fn select_best(results: &[DomainValidationResult]) -> Option<&DomainValidationResult> {
    let mut best: Option<(&DomainValidationResult, f64)> = None;
    for result in results {
        let score = selection_score(result);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((result, score)),
        }
    }
    best.map(|(result, _)| result)
}
