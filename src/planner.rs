//! End-to-end planning pipeline.
//!
//! Runs every stage in order with one [`EngineConfig`]:
//!
//! 1. Build and validate the task graph.
//! 2. PERT-estimate every task (strict).
//! 3. CPM forward/backward pass.
//! 4. Aggregate risk and mood.
//! 5. Evaluate project status.
//! 6. Build the project report.
//!
//! Each stage is a pure function of earlier outputs; the planner owns no
//! mutable state and can be shared across threads.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::cpm::{CriticalPathScheduler, ScheduleResult};
use crate::error::PlanError;
use crate::graph::TaskGraph;
use crate::models::{Developer, Edge, Mood, Task};
use crate::pert;
use crate::report::ProjectReport;
use crate::risk::{self, RiskAggregate};
use crate::simulation::{self, SimulationReport};
use crate::status::{self, ProjectTimeframe, StatusEvaluation};

/// Inputs for one planning run.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub tasks: Vec<Task>,
    pub edges: Vec<Edge>,
    /// Raw mood samples on the -2..=2 scale.
    pub moods: Vec<i64>,
    pub developers: Vec<Developer>,
    /// Project start (t = 0).
    pub start: DateTime<Utc>,
    /// Evaluation time.
    pub now: DateTime<Utc>,
    /// Deadline in schedule units; defaults to the computed duration.
    pub target_duration: Option<f64>,
}

impl PlanRequest {
    /// Creates a request evaluated at `now`, with the project started at `start`.
    pub fn new(tasks: Vec<Task>, start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            tasks,
            edges: Vec::new(),
            moods: Vec::new(),
            developers: Vec::new(),
            start,
            now,
            target_duration: None,
        }
    }

    /// Adds explicit dependency edges.
    pub fn with_edges(mut self, edges: Vec<Edge>) -> Self {
        self.edges = edges;
        self
    }

    /// Sets the mood samples.
    pub fn with_moods(mut self, moods: Vec<i64>) -> Self {
        self.moods = moods;
        self
    }

    /// Sets the developer roster.
    pub fn with_developers(mut self, developers: Vec<Developer>) -> Self {
        self.developers = developers;
        self
    }

    /// Sets the target duration used for probability and confidence.
    pub fn with_target_duration(mut self, target: f64) -> Self {
        self.target_duration = Some(target);
        self
    }
}

/// Everything a planning run produces.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub graph: TaskGraph,
    pub schedule: ScheduleResult,
    pub risk: RiskAggregate,
    pub status: StatusEvaluation,
    pub report: ProjectReport,
}

/// Pipeline runner.
///
/// # Example
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use u_cpm::models::{ProjectStatus, Task};
/// use u_cpm::planner::{PlanRequest, Planner};
///
/// let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
/// let tasks = vec![
///     Task::new("design").with_estimate(2.0, 4.0, 6.0),
///     Task::new("build").with_estimate(3.0, 5.0, 13.0).with_dependency("design"),
/// ];
/// let request = PlanRequest::new(tasks, start, start + Duration::days(2));
///
/// let outcome = Planner::default().plan(request).unwrap();
/// assert_eq!(outcome.schedule.critical_path, vec!["design", "build"]);
/// assert_eq!(outcome.status.status, ProjectStatus::InProgress);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: EngineConfig,
}

impl Planner {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the full pipeline.
    pub fn plan(&self, request: PlanRequest) -> Result<PlanOutcome, PlanError> {
        let moods = Mood::from_values(&request.moods)?;

        let graph = TaskGraph::build(request.tasks, &request.edges)?;
        debug!(tasks = graph.len(), "graph validated");

        let estimates = pert::estimate_graph(&graph)?;
        let schedule = CriticalPathScheduler::new()
            .with_slack_epsilon(self.config.slack_epsilon)
            .schedule(&graph, &estimates)?;

        let risk = risk::aggregate(&graph, &moods, &self.config.mood);

        let timeframe = ProjectTimeframe::new(request.start, self.config.time_unit);
        let status = status::evaluate(
            &schedule,
            &risk,
            &timeframe,
            request.now,
            &status::completion_flags(&graph),
        );

        let target = request.target_duration.unwrap_or(schedule.project_duration);
        let report = ProjectReport::build(
            &graph,
            &schedule,
            &risk,
            &request.developers,
            target,
            &self.config.confidence,
        );

        info!(
            status = ?status.status,
            project_duration = schedule.project_duration,
            confidence = report.confidence,
            "plan evaluated"
        );

        Ok(PlanOutcome {
            graph,
            schedule,
            risk,
            status,
            report,
        })
    }

    /// Runs a Monte Carlo simulation over an already-built graph.
    ///
    /// Uses the same slack tolerance as [`plan`](Self::plan), so the
    /// criticality index agrees with the CPM schedule.
    pub fn simulate(&self, graph: &TaskGraph) -> Result<SimulationReport, PlanError> {
        Ok(simulation::simulate(
            graph,
            &self.config.simulation,
            self.config.slack_epsilon,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MoodThresholds, TimeUnit};
    use crate::error::{GraphError, MoodError, ScheduleError};
    use crate::models::ProjectStatus;
    use crate::risk::SentimentFlag;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("A").with_duration(2.0).completed(),
            Task::new("B").with_duration(3.0).completed(),
            Task::new("C").with_duration(1.0),
        ]
    }

    fn edges() -> Vec<Edge> {
        vec![Edge::new("A", "B"), Edge::new("B", "C")]
    }

    #[test]
    fn test_plan_end_to_end() {
        let request = PlanRequest::new(tasks(), start(), start() + Duration::days(10))
            .with_edges(edges())
            .with_moods(vec![-2, 0, 0]);
        let outcome = Planner::default().plan(request).unwrap();

        assert!((outcome.schedule.project_duration - 6.0).abs() < 1e-10);
        assert_eq!(outcome.schedule.critical_path, vec!["A", "B", "C"]);
        assert_eq!(outcome.risk.sentiment, SentimentFlag::Concerned);
        assert_eq!(outcome.status.status, ProjectStatus::Failure);
        assert_eq!(outcome.status.incomplete_tasks, vec!["C"]);
        assert!((outcome.report.confidence - 0.9).abs() < 1e-10);
    }

    #[test]
    fn test_time_unit_from_config() {
        let config = EngineConfig::default().with_time_unit(TimeUnit::Weeks);
        let request = PlanRequest::new(tasks(), start(), start() + Duration::days(10))
            .with_edges(edges());
        let outcome = Planner::new(config).plan(request).unwrap();
        // 6 weeks have not passed after 10 days.
        assert_eq!(outcome.status.status, ProjectStatus::InProgress);
    }

    #[test]
    fn test_mood_thresholds_from_config() {
        // Mean mood -2/3 is only concerning under the default thresholds.
        let request = || {
            PlanRequest::new(tasks(), start(), start())
                .with_edges(edges())
                .with_moods(vec![-2, 0, 0])
        };
        let lenient =
            EngineConfig::default().with_mood_thresholds(MoodThresholds::new(-1.0, -1.5));

        let outcome = Planner::new(lenient).plan(request()).unwrap();
        assert_eq!(outcome.risk.sentiment, SentimentFlag::Nominal);
        let outcome = Planner::default().plan(request()).unwrap();
        assert_eq!(outcome.risk.sentiment, SentimentFlag::Concerned);
    }

    #[test]
    fn test_plan_rejects_cycle() {
        let mut cyclic = edges();
        cyclic.push(Edge::new("C", "A"));
        let request = PlanRequest::new(tasks(), start(), start()).with_edges(cyclic);
        let err = Planner::default().plan(request).unwrap_err();
        assert!(matches!(err, PlanError::Graph(GraphError::CycleDetected { .. })));
    }

    #[test]
    fn test_plan_rejects_invalid_estimate() {
        let request = PlanRequest::new(
            vec![Task::new("A").with_estimate(5.0, 1.0, 2.0)],
            start(),
            start(),
        );
        let err = Planner::default().plan(request).unwrap_err();
        assert!(matches!(err, PlanError::Schedule(ScheduleError::InvalidEstimate(_))));
    }

    #[test]
    fn test_plan_rejects_empty() {
        let request = PlanRequest::new(Vec::new(), start(), start());
        let err = Planner::default().plan(request).unwrap_err();
        assert_eq!(err, PlanError::Schedule(ScheduleError::EmptyGraph));
    }

    #[test]
    fn test_plan_rejects_bad_mood() {
        let request = PlanRequest::new(tasks(), start(), start()).with_moods(vec![3]);
        let err = Planner::default().plan(request).unwrap_err();
        assert_eq!(err, PlanError::Mood(MoodError::InvalidMood(3)));
    }

    #[test]
    fn test_simulate_uses_config() {
        let graph = TaskGraph::build(tasks(), &edges()).unwrap();
        let report = Planner::default().simulate(&graph).unwrap();
        assert_eq!(report.iterations, 1000);
        assert!((report.mean - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_simulate_and_plan_agree_on_criticality() {
        let tasks = vec![
            Task::new("A").with_duration(1.0),
            Task::new("B").with_duration(1.0 + 1e-7),
        ];
        let graph = TaskGraph::from_tasks(tasks.clone()).unwrap();

        for epsilon in [1e-9, 1e-6] {
            let planner = Planner::new(EngineConfig::default().with_slack_epsilon(epsilon));
            let outcome = planner
                .plan(PlanRequest::new(tasks.clone(), start(), start()))
                .unwrap();
            let report = planner.simulate(&graph).unwrap();

            let a_critical = outcome.schedule.is_critical("A");
            assert_eq!(a_critical, epsilon > 1e-7);
            assert_eq!(report.criticality["A"], if a_critical { 1.0 } else { 0.0 });
        }
    }
}
