//! Task model.
//!
//! A task is a node of the project graph: a unit of work with a
//! three-point duration estimate and a set of dependencies that must
//! finish before it starts.
//!
//! # Time Representation
//! Durations are real-valued, unit-free numbers. The consumer decides
//! what one unit means (see [`TimeUnit`](crate::config::TimeUnit)).
//!
//! # Reference
//! Malcolm et al. (1959), "Application of a Technique for Research and
//! Development Program Evaluation"

use serde::{Deserialize, Serialize};

use super::RiskClassification;

/// A task to be scheduled.
///
/// Only `id` and `estimate` are required when deserializing; the remaining
/// fields default to empty, `None` or `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Three-point duration estimate.
    pub estimate: ThreePointEstimate,
    /// IDs of tasks that must finish before this one starts.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Assigned developer IDs (reporting only).
    #[serde(default)]
    pub developers: Vec<String>,
    /// Risk attached to this task, if any.
    #[serde(default)]
    pub risk: Option<RiskClassification>,
    /// Whether the work is done.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates a new task with a zero estimate.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            estimate: ThreePointEstimate::default(),
            dependencies: Vec::new(),
            developers: Vec::new(),
            risk: None,
            completed: false,
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the three-point estimate.
    pub fn with_estimate(mut self, optimistic: f64, most_likely: f64, pessimistic: f64) -> Self {
        self.estimate = ThreePointEstimate::new(optimistic, most_likely, pessimistic);
        self
    }

    /// Sets a deterministic estimate (all three points equal).
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.estimate = ThreePointEstimate::fixed(duration);
        self
    }

    /// Adds a dependency task ID.
    pub fn with_dependency(mut self, dependency_id: impl Into<String>) -> Self {
        self.dependencies.push(dependency_id.into());
        self
    }

    /// Assigns a developer ID.
    pub fn with_developer(mut self, developer_id: impl Into<String>) -> Self {
        self.developers.push(developer_id.into());
        self
    }

    /// Attaches a risk classification.
    pub fn with_risk(mut self, risk: RiskClassification) -> Self {
        self.risk = Some(risk);
        self
    }

    /// Marks the task as completed.
    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Whether the task has no dependencies.
    pub fn is_source(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// Three-point (optimistic / most likely / pessimistic) estimate.
///
/// Valid estimates satisfy `0 <= optimistic <= most_likely <= pessimistic`.
/// Validation happens in [`pert::estimate`](crate::pert::estimate), not here,
/// so records loaded from storage can be represented as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreePointEstimate {
    pub optimistic: f64,
    pub most_likely: f64,
    pub pessimistic: f64,
}

impl ThreePointEstimate {
    /// Creates an estimate from its three points.
    pub fn new(optimistic: f64, most_likely: f64, pessimistic: f64) -> Self {
        Self {
            optimistic,
            most_likely,
            pessimistic,
        }
    }

    /// Creates an estimate with no uncertainty.
    pub fn fixed(duration: f64) -> Self {
        Self::new(duration, duration, duration)
    }

    /// Spread between pessimistic and optimistic points.
    #[inline]
    pub fn range(&self) -> f64 {
        self.pessimistic - self.optimistic
    }
}

/// An explicit dependency edge: `from` must finish before `to` starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    /// Creates an edge from a dependency to its dependent.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}
