//! Monte Carlo schedule simulation.
//!
//! The PERT normal approximation only looks at the critical path, which
//! underestimates risk when near-critical paths exist. Simulation samples
//! every task's duration and re-runs the CPM passes per iteration.
//!
//! # Algorithm
//!
//! 1. Validate all estimates (strict).
//! 2. For each iteration, sample each task from a triangular distribution
//!    over `(optimistic, most_likely, pessimistic)` by inverse CDF.
//! 3. Run forward/backward passes; record project duration and which
//!    tasks had zero slack.
//! 4. Report duration percentiles and per-task criticality index.
//!
//! # Reference
//! Van Slyke (1963), "Monte Carlo Methods and the PERT Problem"

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::cpm::Passes;
use crate::error::ScheduleError;
use crate::graph::TaskGraph;
use crate::models::ThreePointEstimate;
use crate::pert;

/// Summary of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub iterations: usize,
    pub seed: u64,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub p50: f64,
    pub p85: f64,
    pub p95: f64,
    pub max: f64,
    /// Share of iterations in which each task was critical (0.0..=1.0).
    pub criticality: BTreeMap<String, f64>,
}

/// Sample from a triangular distribution by inverse CDF.
///
/// `u` is a uniform draw in `[0, 1)`.
fn sample_triangular(est: &ThreePointEstimate, u: f64) -> f64 {
    let (a, c, b) = (est.optimistic, est.most_likely, est.pessimistic);
    let range = b - a;
    if range <= 0.0 {
        return a;
    }
    let split = (c - a) / range;
    if u < split {
        a + (u * range * (c - a)).sqrt()
    } else {
        b - ((1.0 - u) * range * (b - c)).sqrt()
    }
}

/// Simulates project durations.
///
/// `slack_epsilon` is the relative zero-slack tolerance, as in
/// [`CriticalPathScheduler::with_slack_epsilon`](crate::cpm::CriticalPathScheduler::with_slack_epsilon);
/// pass [`DEFAULT_SLACK_EPSILON`](crate::cpm::DEFAULT_SLACK_EPSILON) unless the schedule uses another value.
///
/// # Errors
/// - `EmptyGraph` for a graph without tasks.
/// - `InvalidSimulation` when `iterations == 0`.
/// - `InvalidEstimate` for the first invalid task estimate.
pub fn simulate(
    graph: &TaskGraph,
    config: &SimulationConfig,
    slack_epsilon: f64,
) -> Result<SimulationReport, ScheduleError> {
    if graph.is_empty() {
        return Err(ScheduleError::EmptyGraph);
    }
    if config.iterations == 0 {
        return Err(ScheduleError::InvalidSimulation(
            "iterations must be at least 1".into(),
        ));
    }
    pert::estimate_graph(graph)?;

    let tasks = graph.tasks();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut durations = vec![0.0; tasks.len()];
    let mut critical_counts = vec![0usize; tasks.len()];
    let mut samples = Vec::with_capacity(config.iterations);

    for _ in 0..config.iterations {
        for (slot, task) in durations.iter_mut().zip(tasks) {
            *slot = sample_triangular(&task.estimate, rng.random::<f64>());
        }
        let passes = Passes::compute(graph, &durations, slack_epsilon);
        for (i, count) in critical_counts.iter_mut().enumerate() {
            if passes.is_critical(i) {
                *count += 1;
            }
        }
        samples.push(passes.project_duration);
    }

    samples.sort_by(f64::total_cmp);
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

    let criticality = tasks
        .iter()
        .zip(&critical_counts)
        .map(|(t, &c)| (t.id.clone(), c as f64 / n))
        .collect();

    let report = SimulationReport {
        iterations: config.iterations,
        seed: config.seed,
        mean,
        std_dev: variance.sqrt(),
        min: samples[0],
        p50: percentile(&samples, 50.0).unwrap_or(mean),
        p85: percentile(&samples, 85.0).unwrap_or(mean),
        p95: percentile(&samples, 95.0).unwrap_or(mean),
        max: samples[samples.len() - 1],
        criticality,
    };
    debug!(
        iterations = report.iterations,
        mean = report.mean,
        p85 = report.p85,
        "simulation complete"
    );
    Ok(report)
}

/// Nearest-rank percentile of ascending `samples`.
///
/// `None` for empty input or `pct` outside `0..=100`.
fn percentile(samples: &[f64], pct: f64) -> Option<f64> {
    if samples.is_empty() || !(0.0..=100.0).contains(&pct) {
        return None;
    }
    let rank = ((pct / 100.0) * samples.len() as f64).ceil() as usize;
    Some(samples[rank.clamp(1, samples.len()) - 1])
}
