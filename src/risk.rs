//! Risk and sentiment aggregation.
//!
//! Rolls per-task risk classifications and team mood samples up into
//! project-level signals. Nothing here alters schedule times; the output
//! is advisory input for status evaluation and reporting.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Risk counts | Tasks per (kind, severity) |
//! | Risk score | Σ severity weight (Minor 1, Moderate 2, Major 3) |
//! | Mean mood | Arithmetic mean of samples on the -2..=2 scale |
//! | Sentiment | Mean mood against the configured thresholds |

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::config::{ConfidencePenalties, MoodThresholds};
use crate::graph::TaskGraph;
use crate::models::{Mood, RiskKind, RiskSeverity};

/// Team sentiment derived from averaged mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentFlag {
    Nominal,
    Concerned,
    Depressed,
}

impl SentimentFlag {
    /// Classifies a mean mood. `None` (no samples) is nominal.
    pub fn classify(mean_mood: Option<f64>, thresholds: &MoodThresholds) -> Self {
        match mean_mood {
            Some(mean) if mean <= thresholds.very_bad => SentimentFlag::Depressed,
            Some(mean) if mean <= thresholds.bad => SentimentFlag::Concerned,
            _ => SentimentFlag::Nominal,
        }
    }
}

/// Number of tasks sharing a risk kind and severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskBucket {
    pub kind: RiskKind,
    pub severity: RiskSeverity,
    pub count: usize,
}

/// Project-level risk and sentiment signals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAggregate {
    /// Non-empty buckets, ordered by kind then severity.
    pub buckets: Vec<RiskBucket>,
    /// Weighted sum over all risky tasks.
    pub score: u32,
    /// IDs of tasks carrying a risk, in graph order.
    pub risky_tasks: Vec<String>,
    /// Mean of the mood samples; `None` without samples.
    pub mean_mood: Option<f64>,
    pub sample_count: usize,
    pub sentiment: SentimentFlag,
}

impl RiskAggregate {
    /// Count for one (kind, severity) pair.
    pub fn count(&self, kind: RiskKind, severity: RiskSeverity) -> usize {
        self.buckets
            .iter()
            .find(|b| b.kind == kind && b.severity == severity)
            .map(|b| b.count)
            .unwrap_or(0)
    }

    /// Total count for one kind across severities.
    pub fn count_kind(&self, kind: RiskKind) -> usize {
        self.buckets
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| b.count)
            .sum()
    }

    /// Multiplier applied to schedule confidence for the current sentiment.
    pub fn confidence_factor(&self, penalties: &ConfidencePenalties) -> f64 {
        match self.sentiment {
            SentimentFlag::Nominal => 1.0,
            SentimentFlag::Concerned => penalties.concerned,
            SentimentFlag::Depressed => penalties.depressed,
        }
    }
}

/// Aggregates task risks and mood samples.
pub fn aggregate(
    graph: &TaskGraph,
    moods: &[Mood],
    thresholds: &MoodThresholds,
) -> RiskAggregate {
    let mut counts: BTreeMap<(RiskKind, RiskSeverity), usize> = BTreeMap::new();
    let mut score = 0;
    let mut risky_tasks = Vec::new();

    for task in graph.tasks() {
        if let Some(risk) = task.risk {
            *counts.entry((risk.kind, risk.severity)).or_insert(0) += 1;
            score += risk.severity.weight();
            risky_tasks.push(task.id.clone());
        }
    }

    let mean_mood = if moods.is_empty() {
        None
    } else {
        let sum: i64 = moods.iter().map(|m| m.value()).sum();
        Some(sum as f64 / moods.len() as f64)
    };
    let sentiment = SentimentFlag::classify(mean_mood, thresholds);

    debug!(score, risky = risky_tasks.len(), ?mean_mood, ?sentiment, "risk aggregated");

    RiskAggregate {
        buckets: counts
            .into_iter()
            .map(|((kind, severity), count)| RiskBucket {
                kind,
                severity,
                count,
            })
            .collect(),
        score,
        risky_tasks,
        mean_mood,
        sample_count: moods.len(),
        sentiment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskClassification, Task};

    fn moods(values: &[i64]) -> Vec<Mood> {
        Mood::from_values(values).unwrap()
    }

    fn risky_graph() -> TaskGraph {
        let risk = |k, s| RiskClassification::new(k, s);
        TaskGraph::from_tasks(vec![
            Task::new("A").with_risk(risk(RiskKind::Technical, RiskSeverity::Major)),
            Task::new("B").with_risk(risk(RiskKind::Technical, RiskSeverity::Major)),
            Task::new("C").with_risk(risk(RiskKind::Budget, RiskSeverity::Minor)),
            Task::new("D").with_risk(risk(RiskKind::Technical, RiskSeverity::Moderate)),
            Task::new("E"),
        ])
        .unwrap()
    }

    #[test]
    fn test_counts_and_score() {
        let agg = aggregate(&risky_graph(), &[], &MoodThresholds::default());
        assert_eq!(agg.count(RiskKind::Technical, RiskSeverity::Major), 2);
        assert_eq!(agg.count(RiskKind::Budget, RiskSeverity::Minor), 1);
        assert_eq!(agg.count(RiskKind::Resource, RiskSeverity::Minor), 0);
        assert_eq!(agg.count_kind(RiskKind::Technical), 3);
        // 3 + 3 + 1 + 2
        assert_eq!(agg.score, 9);
        assert_eq!(agg.risky_tasks, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_buckets_ordered() {
        let agg = aggregate(&risky_graph(), &[], &MoodThresholds::default());
        let keys: Vec<_> = agg.buckets.iter().map(|b| (b.kind, b.severity)).collect();
        assert_eq!(
            keys,
            vec![
                (RiskKind::Budget, RiskSeverity::Minor),
                (RiskKind::Technical, RiskSeverity::Moderate),
                (RiskKind::Technical, RiskSeverity::Major),
            ]
        );
    }

    #[test]
    fn test_no_samples_is_nominal() {
        let agg = aggregate(&risky_graph(), &[], &MoodThresholds::default());
        assert_eq!(agg.mean_mood, None);
        assert_eq!(agg.sentiment, SentimentFlag::Nominal);
    }

    #[test]
    fn test_concerned_sentiment() {
        let agg = aggregate(&risky_graph(), &moods(&[-2, 0, 0]), &MoodThresholds::default());
        assert!((agg.mean_mood.unwrap() - (-2.0 / 3.0)).abs() < 1e-10);
        assert_eq!(agg.sentiment, SentimentFlag::Concerned);
    }

    #[test]
    fn test_depressed_sentiment() {
        let agg = aggregate(&risky_graph(), &moods(&[-2, -2, 1]), &MoodThresholds::default());
        assert!((agg.mean_mood.unwrap() - -1.0).abs() < 1e-10);
        assert_eq!(agg.sentiment, SentimentFlag::Depressed);
    }

    #[test]
    fn test_threshold_boundaries() {
        let t = MoodThresholds::default();
        assert_eq!(SentimentFlag::classify(Some(-0.5), &t), SentimentFlag::Concerned);
        assert_eq!(SentimentFlag::classify(Some(-0.49), &t), SentimentFlag::Nominal);
        assert_eq!(SentimentFlag::classify(Some(2.0), &t), SentimentFlag::Nominal);
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = MoodThresholds::new(0.0, -0.5);
        let agg = aggregate(&risky_graph(), &moods(&[0, 0]), &strict);
        assert_eq!(agg.sentiment, SentimentFlag::Concerned);
    }

    #[test]
    fn test_confidence_factor() {
        let penalties = ConfidencePenalties::default();
        let graph = risky_graph();
        let nominal = aggregate(&graph, &moods(&[1]), &MoodThresholds::default());
        let depressed = aggregate(&graph, &moods(&[-2]), &MoodThresholds::default());
        assert_eq!(nominal.confidence_factor(&penalties), 1.0);
        assert!((depressed.confidence_factor(&penalties) - 0.75).abs() < 1e-10);
    }
}
