//! Critical Path Method.
//!
//! Computes earliest and latest start/finish times for every task of a
//! validated graph, derives slack, and reconstructs a critical path.
//!
//! # Algorithm
//!
//! 1. Forward pass in topological order:
//!    `ES = max(EF of dependencies)` (0 for sources), `EF = ES + d`.
//! 2. Project duration `T = max(EF)` over sinks.
//! 3. Backward pass in reverse topological order:
//!    `LF = min(LS of dependents)` (`T` for sinks), `LS = LF - d`.
//! 4. `slack = LS - ES`; zero slack (within ε) marks a critical task.
//!
//! # Complexity
//! O(V + E) for both passes.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling"

mod result;

pub use result::{ScheduleResult, TaskSchedule};

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::ScheduleError;
use crate::graph::TaskGraph;
use crate::pert::Estimates;

/// Default relative tolerance for zero-slack comparisons.
pub const DEFAULT_SLACK_EPSILON: f64 = 1e-9;

/// CPM scheduler.
///
/// # Example
///
/// ```
/// use u_cpm::cpm::CriticalPathScheduler;
/// use u_cpm::graph::TaskGraph;
/// use u_cpm::models::Task;
/// use u_cpm::pert;
///
/// let graph = TaskGraph::from_tasks(vec![
///     Task::new("A").with_estimate(2.0, 4.0, 6.0),
///     Task::new("B").with_duration(3.0).with_dependency("A"),
/// ])
/// .unwrap();
/// let estimates = pert::estimate_graph(&graph).unwrap();
///
/// let result = CriticalPathScheduler::new().schedule(&graph, &estimates).unwrap();
/// assert!((result.project_duration - 7.0).abs() < 1e-9);
/// assert_eq!(result.critical_path, vec!["A", "B"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CriticalPathScheduler {
    slack_epsilon: f64,
}

impl Default for CriticalPathScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl CriticalPathScheduler {
    /// Creates a scheduler with the default tolerance.
    pub fn new() -> Self {
        Self {
            slack_epsilon: DEFAULT_SLACK_EPSILON,
        }
    }

    /// Sets the relative zero-slack tolerance.
    ///
    /// The absolute tolerance is `epsilon * max(1, project_duration)`.
    pub fn with_slack_epsilon(mut self, epsilon: f64) -> Self {
        self.slack_epsilon = epsilon.abs();
        self
    }

    /// Runs the forward and backward passes.
    ///
    /// # Errors
    /// - `EmptyGraph` if the graph has no tasks.
    /// - `MissingEstimate` if `estimates` lacks an entry for some task.
    pub fn schedule(
        &self,
        graph: &TaskGraph,
        estimates: &Estimates,
    ) -> Result<ScheduleResult, ScheduleError> {
        if graph.is_empty() {
            return Err(ScheduleError::EmptyGraph);
        }

        let tasks = graph.tasks();
        let mut durations = Vec::with_capacity(tasks.len());
        let mut variances = Vec::with_capacity(tasks.len());
        for task in tasks {
            let est = estimates
                .get(&task.id)
                .ok_or_else(|| ScheduleError::MissingEstimate {
                    task: task.id.clone(),
                })?;
            durations.push(est.expected_duration);
            variances.push(est.variance);
        }

        let passes = Passes::compute(graph, &durations, self.slack_epsilon);
        let critical_path = passes.critical_path(graph);
        let critical_path_variance: f64 = critical_path.iter().map(|&i| variances[i]).sum();

        let mut index = HashMap::with_capacity(tasks.len());
        let mut timings = Vec::with_capacity(tasks.len());
        for &i in graph.topo_indices() {
            let slack = passes.total_slack(i);
            if slack < 0.0 {
                warn!(task = %tasks[i].id, slack, "negative slack in computed schedule");
            }
            index.insert(tasks[i].id.clone(), timings.len());
            timings.push(TaskSchedule {
                task_id: tasks[i].id.clone(),
                expected_duration: durations[i],
                variance: variances[i],
                early_start: passes.es[i],
                early_finish: passes.ef[i],
                late_start: passes.ls[i],
                late_finish: passes.lf[i],
                total_slack: slack,
                free_slack: passes.free_slack(graph, i),
                on_critical_path: passes.is_critical(i),
            });
        }

        let critical_path: Vec<String> =
            critical_path.into_iter().map(|i| tasks[i].id.clone()).collect();
        debug!(
            tasks = timings.len(),
            project_duration = passes.project_duration,
            critical_len = critical_path.len(),
            "cpm schedule computed"
        );

        Ok(ScheduleResult {
            tasks: timings,
            project_duration: passes.project_duration,
            critical_path,
            critical_path_variance,
            index,
        })
    }
}

/// Schedules with the default tolerance.
pub fn schedule(
    graph: &TaskGraph,
    estimates: &Estimates,
) -> Result<ScheduleResult, ScheduleError> {
    CriticalPathScheduler::new().schedule(graph, estimates)
}

/// Raw pass output, indexed by arena position.
#[derive(Debug, Clone)]
pub(crate) struct Passes {
    pub(crate) es: Vec<f64>,
    pub(crate) ef: Vec<f64>,
    pub(crate) ls: Vec<f64>,
    pub(crate) lf: Vec<f64>,
    pub(crate) project_duration: f64,
    /// Absolute zero-slack tolerance.
    pub(crate) epsilon: f64,
}

impl Passes {
    /// Forward and backward passes for arena-indexed `durations`.
    ///
    /// `graph` must be non-empty and `durations.len() == graph.len()`.
    pub(crate) fn compute(graph: &TaskGraph, durations: &[f64], slack_epsilon: f64) -> Self {
        let n = graph.len();
        let order = graph.topo_indices();

        let mut es = vec![0.0; n];
        let mut ef = vec![0.0; n];
        for &i in order {
            es[i] = graph
                .dependency_indices(i)
                .iter()
                .map(|&d| ef[d])
                .fold(0.0, f64::max);
            ef[i] = es[i] + durations[i];
        }

        let project_duration = (0..n)
            .filter(|&i| graph.dependent_indices(i).is_empty())
            .map(|i| ef[i])
            .fold(0.0, f64::max);

        let mut ls = vec![0.0; n];
        let mut lf = vec![0.0; n];
        for &i in order.iter().rev() {
            lf[i] = graph
                .dependent_indices(i)
                .iter()
                .map(|&s| ls[s])
                .fold(project_duration, f64::min);
            ls[i] = lf[i] - durations[i];
        }

        Self {
            es,
            ef,
            ls,
            lf,
            project_duration,
            epsilon: slack_epsilon * project_duration.max(1.0),
        }
    }

    /// Total slack, snapped to zero within tolerance.
    pub(crate) fn total_slack(&self, i: usize) -> f64 {
        self.snap(self.ls[i] - self.es[i])
    }

    pub(crate) fn is_critical(&self, i: usize) -> bool {
        self.total_slack(i) == 0.0
    }

    fn free_slack(&self, graph: &TaskGraph, i: usize) -> f64 {
        let next_start = graph
            .dependent_indices(i)
            .iter()
            .map(|&s| self.es[s])
            .fold(self.project_duration, f64::min);
        self.snap(next_start - self.ef[i])
    }

    fn snap(&self, value: f64) -> f64 {
        if value.abs() <= self.epsilon {
            0.0
        } else {
            value
        }
    }

    /// Orders by early finish (within tolerance), preferring the smaller ID on ties.
    fn cmp_finish(&self, graph: &TaskGraph, a: usize, b: usize) -> Ordering {
        let diff = self.ef[a] - self.ef[b];
        let by_finish = if diff.abs() <= self.epsilon {
            Ordering::Equal
        } else {
            self.ef[a].total_cmp(&self.ef[b])
        };
        let tasks = graph.tasks();
        by_finish.then_with(|| tasks[b].id.cmp(&tasks[a].id))
    }

    /// Arena indices of a critical path, source first.
    ///
    /// Starts at the zero-slack sink with the latest finish and walks back
    /// through zero-slack dependencies, taking the latest-finishing one at
    /// each branch (smallest ID on ties).
    pub(crate) fn critical_path(&self, graph: &TaskGraph) -> Vec<usize> {
        let Some(mut current) = (0..graph.len())
            .filter(|&i| graph.dependent_indices(i).is_empty() && self.is_critical(i))
            .max_by(|&a, &b| self.cmp_finish(graph, a, b))
        else {
            return Vec::new();
        };

        let mut path = vec![current];
        while let Some(prev) = graph
            .dependency_indices(current)
            .iter()
            .copied()
            .filter(|&d| self.is_critical(d))
            .max_by(|&a, &b| self.cmp_finish(graph, a, b))
        {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}
