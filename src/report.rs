//! Project report.
//!
//! Read-only roll-up of a scheduling run for the reporting layer.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Project duration | Critical path length |
//! | On-time probability | Φ((target - T) / σ_cp) |
//! | Confidence | On-time probability × sentiment factor |
//! | Developer load | Assigned / critical task counts, expected work |
//! | Critical skills | Skills of developers assigned to critical tasks |

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::ConfidencePenalties;
use crate::cpm::ScheduleResult;
use crate::graph::TaskGraph;
use crate::models::Developer;
use crate::risk::RiskAggregate;

/// Workload of one developer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperLoad {
    pub developer_id: String,
    pub assigned_tasks: usize,
    pub critical_tasks: usize,
    /// Sum of expected durations of assigned tasks.
    pub expected_work: f64,
}

/// Project-level summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub project_duration: f64,
    pub critical_path: Vec<String>,
    /// Target duration the probabilities refer to.
    pub target_duration: f64,
    pub on_time_probability: f64,
    /// On-time probability adjusted for team sentiment.
    pub confidence: f64,
    pub risk_score: u32,
    /// Per-developer rows, sorted by developer ID.
    pub developer_load: Vec<DeveloperLoad>,
    /// Skill names held by developers on critical tasks, sorted.
    pub critical_skills: Vec<String>,
    /// Developer IDs referenced by tasks but absent from the roster.
    pub unknown_developers: Vec<String>,
}

impl ProjectReport {
    /// Builds a report for a deadline of `target_duration` schedule units.
    pub fn build(
        graph: &TaskGraph,
        schedule: &ScheduleResult,
        risk: &RiskAggregate,
        developers: &[Developer],
        target_duration: f64,
        penalties: &ConfidencePenalties,
    ) -> Self {
        let mut load: BTreeMap<&str, DeveloperLoad> = BTreeMap::new();
        let mut critical_devs: BTreeSet<&str> = BTreeSet::new();

        for timing in &schedule.tasks {
            let Some(task) = graph.task(&timing.task_id) else {
                continue;
            };
            for dev in &task.developers {
                let row = load.entry(dev.as_str()).or_insert_with(|| DeveloperLoad {
                    developer_id: dev.clone(),
                    assigned_tasks: 0,
                    critical_tasks: 0,
                    expected_work: 0.0,
                });
                row.assigned_tasks += 1;
                row.expected_work += timing.expected_duration;
                if timing.on_critical_path {
                    row.critical_tasks += 1;
                    critical_devs.insert(dev.as_str());
                }
            }
        }

        let critical_skills: BTreeSet<String> = developers
            .iter()
            .filter(|d| critical_devs.contains(d.id.as_str()))
            .flat_map(|d| d.skills.iter().map(|s| s.name.clone()))
            .collect();

        let unknown_developers = load
            .keys()
            .filter(|id| !developers.iter().any(|d| d.id == **id))
            .map(|id| id.to_string())
            .collect();

        let on_time_probability = schedule.on_time_probability(target_duration);

        Self {
            project_duration: schedule.project_duration,
            critical_path: schedule.critical_path.clone(),
            target_duration,
            on_time_probability,
            confidence: on_time_probability * risk.confidence_factor(penalties),
            risk_score: risk.score,
            developer_load: load.into_values().collect(),
            critical_skills: critical_skills.into_iter().collect(),
            unknown_developers,
        }
    }

    /// Load row for a developer.
    pub fn load_for(&self, developer_id: &str) -> Option<&DeveloperLoad> {
        self.developer_load
            .iter()
            .find(|l| l.developer_id == developer_id)
    }
}
