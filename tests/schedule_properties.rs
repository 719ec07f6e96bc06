//! Property-based tests for graph validation and CPM scheduling.
//!
//! Random DAGs are generated by letting each task depend only on tasks
//! created before it, then inserting the tasks in reverse so the graph
//! has to find the order itself.

use std::collections::HashMap;

use proptest::prelude::*;
use u_cpm::cpm;
use u_cpm::error::GraphError;
use u_cpm::graph::TaskGraph;
use u_cpm::models::{Edge, Task};
use u_cpm::pert;

// ============================================================================
// Generators
// ============================================================================

/// Generate a sorted three-point estimate
fn arb_estimate() -> impl Strategy<Value = (f64, f64, f64)> {
    (0.0f64..20.0, 0.0f64..20.0, 0.0f64..20.0).prop_map(|(a, b, c)| {
        let mut points = [a, b, c];
        points.sort_by(f64::total_cmp);
        (points[0], points[1], points[2])
    })
}

/// Generate an acyclic task list of 1..24 tasks
fn arb_dag() -> impl Strategy<Value = Vec<Task>> {
    (1usize..24)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(prop::collection::vec(any::<bool>(), n), n),
                prop::collection::vec(arb_estimate(), n),
            )
        })
        .prop_map(|(adjacency, estimates)| {
            let mut tasks: Vec<Task> = estimates
                .iter()
                .enumerate()
                .map(|(i, &(o, m, p))| Task::new(format!("T{i:02}")).with_estimate(o, m, p))
                .collect();
            for (i, row) in adjacency.iter().enumerate() {
                for (j, &edge) in row.iter().enumerate().take(i) {
                    if edge {
                        tasks[i].dependencies.push(format!("T{j:02}"));
                    }
                }
            }
            tasks.reverse();
            tasks
        })
}

fn tolerance(duration: f64) -> f64 {
    1e-6 * duration.max(1.0)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn topological_order_is_a_linearization(tasks in arb_dag()) {
        let graph = TaskGraph::from_tasks(tasks).unwrap();
        let order = graph.topological_ids();
        prop_assert_eq!(order.len(), graph.len());

        let pos: HashMap<&str, usize> = order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        for task in graph.tasks() {
            for dep in &task.dependencies {
                prop_assert!(pos[dep.as_str()] < pos[task.id.as_str()]);
            }
        }
    }

    #[test]
    fn timings_are_consistent(tasks in arb_dag()) {
        let graph = TaskGraph::from_tasks(tasks).unwrap();
        let estimates = pert::estimate_graph(&graph).unwrap();
        let result = cpm::schedule(&graph, &estimates).unwrap();

        for t in &result.tasks {
            prop_assert!(t.early_finish >= t.early_start);
            prop_assert!(t.late_finish >= t.late_start);
            prop_assert!(t.total_slack >= 0.0, "negative slack on {}", t.task_id);
            prop_assert!(t.free_slack >= 0.0);
            prop_assert!(t.free_slack <= t.total_slack + tolerance(result.project_duration));
            prop_assert!(t.late_finish <= result.project_duration + tolerance(result.project_duration));
        }
    }

    #[test]
    fn every_finishing_sink_heads_a_critical_chain(tasks in arb_dag()) {
        let graph = TaskGraph::from_tasks(tasks).unwrap();
        let estimates = pert::estimate_graph(&graph).unwrap();
        let result = cpm::schedule(&graph, &estimates).unwrap();

        let finishing: Vec<_> = graph
            .sinks()
            .into_iter()
            .filter(|sink| result.task(&sink.id).unwrap().early_finish == result.project_duration)
            .collect();
        prop_assert!(!finishing.is_empty());

        for sink in finishing {
            prop_assert!(result.is_critical(&sink.id), "sink {} not critical", sink.id);
        }
        // A zero-slack task is either a source or has a zero-slack dependency,
        // so walking back from any critical sink reaches a source.
        for t in result.critical_tasks() {
            let deps = graph.dependencies(&t.task_id);
            prop_assert!(
                deps.is_empty() || deps.iter().any(|d| result.is_critical(&d.id)),
                "critical {} has no critical dependency",
                t.task_id
            );
        }
    }

    #[test]
    fn critical_path_spans_project(tasks in arb_dag()) {
        let graph = TaskGraph::from_tasks(tasks).unwrap();
        let estimates = pert::estimate_graph(&graph).unwrap();
        let result = cpm::schedule(&graph, &estimates).unwrap();
        let path = &result.critical_path;

        prop_assert!(!path.is_empty());
        prop_assert!(graph.task(&path[0]).unwrap().dependencies.is_empty());
        prop_assert!(graph.dependents(path.last().unwrap()).is_empty());

        for pair in path.windows(2) {
            let dependent = graph.task(&pair[1]).unwrap();
            prop_assert!(dependent.dependencies.contains(&pair[0]));
        }

        let length: f64 = path.iter().map(|id| result.task(id).unwrap().expected_duration).sum();
        for id in path {
            prop_assert!(result.is_critical(id));
        }
        prop_assert!((length - result.project_duration).abs() <= tolerance(result.project_duration));
    }

    #[test]
    fn schedule_is_idempotent(tasks in arb_dag()) {
        let graph = TaskGraph::from_tasks(tasks).unwrap();
        let estimates = pert::estimate_graph(&graph).unwrap();
        prop_assert_eq!(
            cpm::schedule(&graph, &estimates).unwrap(),
            cpm::schedule(&graph, &estimates).unwrap()
        );
    }

    #[test]
    fn closing_a_chain_is_rejected(n in 1usize..12) {
        let tasks: Vec<Task> = (0..n).map(|i| Task::new(format!("T{i}"))).collect();
        let mut edges: Vec<Edge> = (1..n)
            .map(|i| Edge::new(format!("T{}", i - 1), format!("T{i}")))
            .collect();
        edges.push(Edge::new(format!("T{}", n - 1), "T0"));

        match TaskGraph::build(tasks, &edges) {
            Err(GraphError::CycleDetected { cycle }) => {
                prop_assert_eq!(cycle.len(), n + 1);
                prop_assert_eq!(cycle.first(), cycle.last());
            }
            other => prop_assert!(false, "expected cycle, got {:?}", other),
        }
    }
}
