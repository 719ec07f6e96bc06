//! Project scheduling engine for the U-Engine ecosystem.
//!
//! Turns a dependency graph of tasks with three-point estimates into
//! CPM timings, a critical path, risk and sentiment signals, and a
//! point-in-time project status.
//!
//! # Modules
//!
//! - **`models`**: Input records: `Task`, `Edge`, `Developer`, `Mood`,
//!   risk classifications and `ProjectStatus`
//! - **`graph`**: Validated DAG (duplicate IDs, dangling references, cycles)
//!   with a topological order
//! - **`pert`**: Three-point estimation and normal-approximation probabilities
//! - **`cpm`**: Forward/backward pass, slack, critical path
//! - **`risk`**: Risk counts, weighted score, mood sentiment
//! - **`status`**: Success / InProgress / Failure classification
//! - **`simulation`**: Monte Carlo duration percentiles and criticality index
//! - **`report`**: Developer load, confidence and critical skills
//! - **`planner`**: The whole pipeline behind one call
//!
//! # Pipeline
//!
//! Graph → PERT → CPM → Risk → Status. Each stage is a pure function of
//! earlier outputs; nothing is mutated in place.
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Malcolm et al. (1959), "Application of a Technique for Research and
//!   Development Program Evaluation"
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4

pub mod config;
pub mod cpm;
pub mod error;
pub mod graph;
pub mod models;
pub mod pert;
pub mod planner;
pub mod report;
pub mod risk;
pub mod simulation;
pub mod status;
