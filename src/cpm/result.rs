//! CPM output model.
//!
//! Field names serialize in camelCase to match the persisted task
//! attributes (`earlyStart`, `earlyFinish`, `lateStart`, `lateFinish`).

use std::collections::HashMap;

use serde::Serialize;

use crate::pert;

/// Timing of one task in a computed schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSchedule {
    pub task_id: String,
    pub expected_duration: f64,
    pub variance: f64,
    pub early_start: f64,
    pub early_finish: f64,
    pub late_start: f64,
    pub late_finish: f64,
    /// `late_start - early_start`.
    pub total_slack: f64,
    /// Delay absorbable without moving any dependent's early start.
    pub free_slack: f64,
    pub on_critical_path: bool,
}

/// Result of a forward/backward pass over a task graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    /// Per-task timings, in topological order.
    pub tasks: Vec<TaskSchedule>,
    /// Latest early finish over all sinks.
    pub project_duration: f64,
    /// Zero-slack chain from a source to a sink.
    pub critical_path: Vec<String>,
    /// Sum of task variances along `critical_path`.
    pub critical_path_variance: f64,
    #[serde(skip)]
    pub(crate) index: HashMap<String, usize>,
}

impl ScheduleResult {
    /// Timing for a task.
    pub fn task(&self, id: &str) -> Option<&TaskSchedule> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    /// Whether a task has zero slack.
    pub fn is_critical(&self, id: &str) -> bool {
        self.task(id).is_some_and(|t| t.on_critical_path)
    }

    /// All zero-slack tasks, in topological order.
    pub fn critical_tasks(&self) -> impl Iterator<Item = &TaskSchedule> {
        self.tasks.iter().filter(|t| t.on_critical_path)
    }

    /// Number of tasks scheduled.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Standard deviation of the project duration along the critical path.
    pub fn critical_path_std_dev(&self) -> f64 {
        self.critical_path_variance.sqrt()
    }

    /// Probability of finishing within `target` time units.
    ///
    /// Normal approximation over the critical path (central limit theorem);
    /// near-critical paths are ignored, so this is optimistic for wide graphs.
    pub fn on_time_probability(&self, target: f64) -> f64 {
        pert::probability_within(self.project_duration, self.critical_path_variance, target)
    }
}
