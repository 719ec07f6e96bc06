//! Validated task graph.
//!
//! Checks structural integrity of a task set before scheduling and
//! produces a topological order. Detects:
//! - Duplicate task IDs
//! - Dependencies on tasks that don't exist
//! - Circular dependencies, self-loops included
//!
//! Tasks are stored in an arena and edges as index lists, so traversal
//! never follows references that could themselves form a cycle.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::HashMap;

use crate::error::GraphError;
use crate::models::{Edge, Task};

/// An immutable, acyclic task graph.
///
/// Built only through [`TaskGraph::build`] or [`TaskGraph::from_tasks`];
/// every instance satisfies the graph invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
    /// `dependencies[i]`: arena indices of tasks `i` depends on.
    dependencies: Vec<Vec<usize>>,
    /// `dependents[i]`: arena indices of tasks depending on `i`.
    dependents: Vec<Vec<usize>>,
    /// Arena indices, every dependency before its dependents.
    topo_order: Vec<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    OnStack,
    Done,
}

impl TaskGraph {
    /// Builds a graph from tasks plus extra edges.
    ///
    /// Each edge is merged into its target's dependency list. Repeated
    /// dependencies collapse onto their first occurrence.
    pub fn build(tasks: Vec<Task>, edges: &[Edge]) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            if index.insert(task.id.clone(), i).is_some() {
                return Err(GraphError::DuplicateTask {
                    id: task.id.clone(),
                });
            }
        }

        let mut tasks = tasks;
        for edge in edges {
            let Some(&to) = index.get(&edge.to) else {
                return Err(GraphError::DanglingReference {
                    task: edge.to.clone(),
                    dependency: edge.from.clone(),
                });
            };
            tasks[to].dependencies.push(edge.from.clone());
        }

        let mut dependencies = Vec::with_capacity(tasks.len());
        let mut dependents = vec![Vec::new(); tasks.len()];
        for (i, task) in tasks.iter_mut().enumerate() {
            let declared = std::mem::take(&mut task.dependencies);
            let mut deps: Vec<usize> = Vec::with_capacity(declared.len());
            for dep in declared {
                let Some(&d) = index.get(&dep) else {
                    return Err(GraphError::DanglingReference {
                        task: task.id.clone(),
                        dependency: dep,
                    });
                };
                if !deps.contains(&d) {
                    deps.push(d);
                    dependents[d].push(i);
                    task.dependencies.push(dep);
                }
            }
            dependencies.push(deps);
        }

        let topo_order = topological_order(&tasks, &dependencies)?;

        Ok(Self {
            tasks,
            index,
            dependencies,
            dependents,
            topo_order,
        })
    }

    /// Builds a graph from tasks whose dependencies are already inline.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, GraphError> {
        Self::build(tasks, &[])
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the graph has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by ID.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    /// Whether a task with this ID exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Tasks in topological order (dependencies first).
    pub fn topological_order(&self) -> impl DoubleEndedIterator<Item = &Task> + '_ {
        self.topo_order.iter().map(move |&i| &self.tasks[i])
    }

    /// Task IDs in topological order.
    pub fn topological_ids(&self) -> Vec<&str> {
        self.topological_order().map(|t| t.id.as_str()).collect()
    }

    /// Direct dependencies of a task.
    pub fn dependencies(&self, id: &str) -> Vec<&Task> {
        self.neighbors(id, &self.dependencies)
    }

    /// Direct dependents of a task.
    pub fn dependents(&self, id: &str) -> Vec<&Task> {
        self.neighbors(id, &self.dependents)
    }

    /// Tasks without dependencies.
    pub fn sources(&self) -> Vec<&Task> {
        self.filter_by(|i| self.dependencies[i].is_empty())
    }

    /// Tasks without dependents.
    pub fn sinks(&self) -> Vec<&Task> {
        self.filter_by(|i| self.dependents[i].is_empty())
    }

    /// Groups task IDs by longest-path depth from a source.
    ///
    /// No two tasks in a level depend on each other, so a level can be
    /// processed in parallel. Within a level, IDs are in topological order.
    pub fn levels(&self) -> Vec<Vec<&str>> {
        let mut depth = vec![0usize; self.tasks.len()];
        for &i in &self.topo_order {
            depth[i] = self.dependencies[i]
                .iter()
                .map(|&d| depth[d] + 1)
                .max()
                .unwrap_or(0);
        }

        let mut levels: Vec<Vec<&str>> = Vec::new();
        for &i in &self.topo_order {
            if levels.len() <= depth[i] {
                levels.resize_with(depth[i] + 1, Vec::new);
            }
            levels[depth[i]].push(&self.tasks[i].id);
        }
        levels
    }

    pub(crate) fn topo_indices(&self) -> &[usize] {
        &self.topo_order
    }

    pub(crate) fn dependency_indices(&self, i: usize) -> &[usize] {
        &self.dependencies[i]
    }

    pub(crate) fn dependent_indices(&self, i: usize) -> &[usize] {
        &self.dependents[i]
    }

    fn neighbors<'a>(&'a self, id: &str, adj: &'a [Vec<usize>]) -> Vec<&'a Task> {
        self.index
            .get(id)
            .map(|&i| adj[i].iter().map(|&j| &self.tasks[j]).collect())
            .unwrap_or_default()
    }

    fn filter_by(&self, pred: impl Fn(usize) -> bool) -> Vec<&Task> {
        (0..self.tasks.len())
            .filter(|&i| pred(i))
            .map(|i| &self.tasks[i])
            .collect()
    }
}

/// Computes a topological order by DFS over dependency lists.
///
/// # Algorithm
/// Post-order DFS: a task is emitted after all its dependencies. Meeting a
/// node that is still on the stack is a back edge, i.e. a cycle; the stack
/// slice from that node is reported.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn topological_order(
    tasks: &[Task],
    dependencies: &[Vec<usize>],
) -> Result<Vec<usize>, GraphError> {
    let mut state = vec![VisitState::Unvisited; tasks.len()];
    let mut order = Vec::with_capacity(tasks.len());

    for node in 0..tasks.len() {
        if state[node] == VisitState::Unvisited {
            visit(node, dependencies, &mut state, &mut order).map_err(|cycle| {
                GraphError::CycleDetected {
                    cycle: cycle.into_iter().map(|i| tasks[i].id.clone()).collect(),
                }
            })?;
        }
    }

    Ok(order)
}

/// Iterative DFS from `root`.
///
/// Each frame holds a node and the position of the next dependency to
/// explore, so depth is bounded by the heap rather than the call stack.
fn visit(
    root: usize,
    dependencies: &[Vec<usize>],
    state: &mut [VisitState],
    order: &mut Vec<usize>,
) -> Result<(), Vec<usize>> {
    let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
    state[root] = VisitState::OnStack;

    while let Some(&(node, cursor)) = stack.last() {
        let Some(&next) = dependencies[node].get(cursor) else {
            stack.pop();
            state[node] = VisitState::Done;
            order.push(node);
            continue;
        };
        let top = stack.len() - 1;
        stack[top].1 += 1;

        match state[next] {
            VisitState::OnStack => {
                // Back edge → cycle. The walk followed dependency edges, so
                // reverse it to read in dependency → dependent direction.
                let start = stack.iter().position(|&(n, _)| n == next).unwrap_or(0);
                let cycle: Vec<usize> = stack[start..].iter().rev().map(|&(n, _)| n).collect();
                return Err(close_cycle(cycle));
            }
            VisitState::Unvisited => {
                state[next] = VisitState::OnStack;
                stack.push((next, 0));
            }
            VisitState::Done => {}
        }
    }

    Ok(())
}

/// Rotates a cycle to start at its smallest index and repeats that node at the end.
fn close_cycle(mut cycle: Vec<usize>) -> Vec<usize> {
    if let Some(min_pos) = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, &n)| n)
        .map(|(p, _)| p)
    {
        cycle.rotate_left(min_pos);
    }
    if let Some(&first) = cycle.first() {
        cycle.push(first);
    }
    cycle
}
