//! PERT three-point estimation.
//!
//! Converts optimistic / most likely / pessimistic estimates into an
//! expected duration and variance under the beta-PERT approximation:
//!
//! ```text
//! E = (o + 4m + p) / 6
//! V = ((p - o) / 6)^2
//! ```
//!
//! # Reference
//! Malcolm et al. (1959), "Application of a Technique for Research and
//! Development Program Evaluation", Operations Research 7(5)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;
use crate::graph::TaskGraph;
use crate::models::{Task, ThreePointEstimate};

/// Expected duration and variance of one task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PertEstimate {
    pub expected_duration: f64,
    pub variance: f64,
}

impl PertEstimate {
    /// Standard deviation (square root of the variance).
    #[inline]
    pub fn standard_deviation(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Estimates keyed by task ID.
pub type Estimates = HashMap<String, PertEstimate>;

/// Estimates a single task.
///
/// # Errors
/// `InvalidEstimate` if any point is negative or non-finite, if
/// `optimistic <= most_likely <= pessimistic` does not hold, or if the
/// expected duration or variance overflows to infinity.
pub fn estimate(task: &Task) -> Result<PertEstimate, EstimateError> {
    let invalid = |reason| EstimateError::InvalidEstimate {
        task: task.id.clone(),
        reason,
    };
    validate(&task.estimate).map_err(invalid)?;

    let ThreePointEstimate {
        optimistic: o,
        most_likely: m,
        pessimistic: p,
    } = task.estimate;

    let expected_duration = (o + 4.0 * m + p) / 6.0;
    let spread = (p - o) / 6.0;
    let variance = spread * spread;
    if !expected_duration.is_finite() || !variance.is_finite() {
        return Err(invalid(format!(
            "estimate range too large: expected {expected_duration}, variance {variance}"
        )));
    }
    Ok(PertEstimate {
        expected_duration,
        variance,
    })
}

/// Estimates every task in a graph.
///
/// Strict: the first invalid task (in topological order) aborts the run.
pub fn estimate_graph(graph: &TaskGraph) -> Result<Estimates, EstimateError> {
    graph
        .topological_order()
        .map(|task| estimate(task).map(|est| (task.id.clone(), est)))
        .collect()
}

/// Probability that a normally distributed duration finishes by `target`.
///
/// Uses `Φ((target - mean) / σ)`. With zero variance the outcome is
/// certain: 1.0 if `target >= mean`, else 0.0.
pub fn probability_within(mean: f64, variance: f64, target: f64) -> f64 {
    if variance <= 0.0 {
        return if target >= mean { 1.0 } else { 0.0 };
    }
    normal_cdf((target - mean) / variance.sqrt())
}

fn validate(est: &ThreePointEstimate) -> Result<(), String> {
    let points = [
        ("optimistic", est.optimistic),
        ("mostLikely", est.most_likely),
        ("pessimistic", est.pessimistic),
    ];
    for (name, value) in points {
        if !value.is_finite() {
            return Err(format!("{name} is not a finite number"));
        }
        if value < 0.0 {
            return Err(format!("{name} is negative ({value})"));
        }
    }
    if est.optimistic > est.most_likely {
        return Err(format!(
            "optimistic ({}) exceeds mostLikely ({})",
            est.optimistic, est.most_likely
        ));
    }
    if est.most_likely > est.pessimistic {
        return Err(format!(
            "mostLikely ({}) exceeds pessimistic ({})",
            est.most_likely, est.pessimistic
        ));
    }
    Ok(())
}

/// Standard normal CDF.
///
/// Abramowitz & Stegun 7.1.26 approximation of erf; absolute error < 1.5e-7.
fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}
