//! Error types for every stage of a scheduling run.
//!
//! Structural errors ([`GraphError`]) and estimate errors
//! ([`EstimateError`]) are fatal to the run: no partial result is
//! produced. There is no transient failure mode, so nothing is retried.

use thiserror::Error;

/// Structural problems with a task graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Two tasks share the same identifier.
    #[error("duplicate task id: '{id}'")]
    DuplicateTask { id: String },

    /// A task depends on an identifier that is not in the graph.
    #[error("task '{task}' depends on unknown task '{dependency}'")]
    DanglingReference { task: String, dependency: String },

    /// The dependency relation contains a cycle (self-loops included).
    #[error("circular dependency: {}", .cycle.join(" -> "))]
    CycleDetected {
        /// Node sequence of the cycle, closing on its first node.
        cycle: Vec<String>,
    },
}

/// A three-point estimate that cannot be turned into a duration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("invalid estimate for task '{task}': {reason}")]
    InvalidEstimate { task: String, reason: String },
}

/// Failures of a CPM or simulation run over a validated graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The graph has no tasks.
    #[error("cannot schedule an empty graph")]
    EmptyGraph,

    /// No estimate was supplied for a task in the graph.
    #[error("no estimate supplied for task '{task}'")]
    MissingEstimate { task: String },

    #[error(transparent)]
    InvalidEstimate(#[from] EstimateError),

    /// Simulation parameters are unusable.
    #[error("invalid simulation config: {0}")]
    InvalidSimulation(String),
}

/// A mood value outside the `-2..=2` scale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoodError {
    #[error("mood value {0} is outside the range -2..=2")]
    InvalidMood(i64),
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Any failure of the full planning pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Mood(#[from] MoodError),
}

impl From<EstimateError> for PlanError {
    fn from(err: EstimateError) -> Self {
        PlanError::Schedule(ScheduleError::InvalidEstimate(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_nodes() {
        let err = GraphError::CycleDetected {
            cycle: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "circular dependency: A -> B -> A");
    }

    #[test]
    fn test_estimate_error_converts_to_plan_error() {
        let err = EstimateError::InvalidEstimate {
            task: "T1".into(),
            reason: "negative".into(),
        };
        let plan: PlanError = err.clone().into();
        assert_eq!(plan, PlanError::Schedule(ScheduleError::InvalidEstimate(err)));
    }
}
