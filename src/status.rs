//! Project status evaluation.
//!
//! Combines the computed project duration, the calendar start of the
//! project, the current time, and per-task completion flags into a
//! point-in-time [`ProjectStatus`].
//!
//! | Time frame | All tasks complete | Status |
//! |------------|--------------------|--------|
//! | not elapsed | any | InProgress |
//! | elapsed | yes | Success |
//! | elapsed | no | Failure |
//!
//! Risk and sentiment are carried through for reporting but never force
//! an early failure. The status is recomputed on every call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TimeUnit;
use crate::cpm::ScheduleResult;
use crate::graph::TaskGraph;
use crate::models::ProjectStatus;
use crate::risk::{RiskAggregate, SentimentFlag};

/// Completion flag per task ID. Missing entries count as incomplete.
pub type CompletionFlags = HashMap<String, bool>;

/// Calendar anchor of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTimeframe {
    /// When work started (t = 0 of the schedule).
    pub start: DateTime<Utc>,
    /// Calendar length of one schedule unit.
    pub unit: TimeUnit,
}

impl ProjectTimeframe {
    pub fn new(start: DateTime<Utc>, unit: TimeUnit) -> Self {
        Self { start, unit }
    }

    /// Calendar end of a schedule lasting `duration` units.
    ///
    /// `None` when the end is not representable; such a time frame never elapses.
    pub fn end(&self, duration: f64) -> Option<DateTime<Utc>> {
        self.unit
            .to_duration(duration)
            .and_then(|d| self.start.checked_add_signed(d))
    }
}

/// Outcome of a status evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvaluation {
    pub status: ProjectStatus,
    /// End of the time frame, if representable.
    pub ends_at: Option<DateTime<Utc>>,
    pub sentiment: SentimentFlag,
    pub risk_score: u32,
    /// Scheduled tasks not flagged complete, in topological order.
    pub incomplete_tasks: Vec<String>,
}

impl StatusEvaluation {
    /// Whether every scheduled task is complete.
    pub fn all_complete(&self) -> bool {
        self.incomplete_tasks.is_empty()
    }
}

/// Collects completion flags from the task records of a graph.
pub fn completion_flags(graph: &TaskGraph) -> CompletionFlags {
    graph
        .tasks()
        .iter()
        .map(|t| (t.id.clone(), t.completed))
        .collect()
}

/// Classifies the project at time `now`.
pub fn evaluate(
    schedule: &ScheduleResult,
    risk: &RiskAggregate,
    timeframe: &ProjectTimeframe,
    now: DateTime<Utc>,
    completion: &CompletionFlags,
) -> StatusEvaluation {
    let incomplete_tasks: Vec<String> = schedule
        .tasks
        .iter()
        .filter(|t| !completion.get(&t.task_id).copied().unwrap_or(false))
        .map(|t| t.task_id.clone())
        .collect();

    let ends_at = timeframe.end(schedule.project_duration);
    let elapsed = ends_at.is_some_and(|end| now >= end);

    let status = match (elapsed, incomplete_tasks.is_empty()) {
        (false, _) => ProjectStatus::InProgress,
        (true, true) => ProjectStatus::Success,
        (true, false) => ProjectStatus::Failure,
    };

    StatusEvaluation {
        status,
        ends_at,
        sentiment: risk.sentiment,
        risk_score: risk.score,
        incomplete_tasks,
    }
}
