//! Ability estimation against a 1-3 parameter logistic IRT model.
//!
//! The estimator keeps one scalar theta per section and nudges it after each
//! boolean-scored response with a single bounded gradient step toward the
//! maximum-likelihood estimate. This is a lightweight practice-product
//! heuristic, not a full CAT engine: no information functions, no
//! standard-error stopping rules.

use crate::model::IrtParams;

/// Fixed step size for the gradient update.
pub const LEARNING_RATE: f64 = 0.6;

/// Lower bound of the ability scale.
pub const THETA_MIN: f64 = -3.0;

/// Upper bound of the ability scale.
pub const THETA_MAX: f64 = 3.0;

/// Logistic function, hard-clamped outside `[-20, 20]` to avoid overflow.
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    if x < -20.0 {
        0.0
    } else if x > 20.0 {
        1.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

/// Probability of a correct response: `c + (1-c) * sigmoid(a * (theta - b))`.
#[must_use]
pub fn probability_correct(theta: f64, params: &IrtParams) -> f64 {
    let c = params.guessing();
    c + (1.0 - c) * sigmoid(params.a * (theta - params.b))
}

/// One stochastic-gradient step toward the likelihood of the observed
/// response, clamped to `[THETA_MIN, THETA_MAX]`.
///
/// Callers apply this only when the item carries IRT parameters and the
/// response was boolean-scored; indeterminate responses and non-adaptive
/// items never move theta.
#[must_use]
pub fn update_theta(theta: f64, params: &IrtParams, correct: bool) -> f64 {
    let p = probability_correct(theta, params);
    let u = if correct { 1.0 } else { 0.0 };
    (theta + LEARNING_RATE * (u - p)).clamp(THETA_MIN, THETA_MAX)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
