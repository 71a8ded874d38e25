//! Topological ordering of the schedule graph (Kahn's algorithm).

use std::collections::VecDeque;

use crate::interner::TaskIdx;

use super::graph::ScheduleGraph;

/// Result of ordering the graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopoOrder {
    /// Tasks such that every task follows all of its predecessors.
    pub order: Vec<TaskIdx>,
    /// Tasks never released: members of a cycle or downstream of one.
    pub excluded: Vec<TaskIdx>,
}

/// Order tasks so that predecessors come before successors.
///
/// Unlike a strict sort this never fails: tasks whose in-degree never drops
/// to zero are returned in `excluded` (ascending index order) and the rest of
/// the graph is still ordered. Ties are broken by load order.
pub fn topological_order(graph: &ScheduleGraph) -> TopoOrder {
    let n = graph.len();
    let mut in_degree: Vec<usize> = graph.preds.iter().map(Vec::len).collect();

    let mut queue: VecDeque<TaskIdx> = (0..n)
        .filter(|&i| in_degree[i] == 0)
        .map(|i| i as TaskIdx)
        .collect();

    let mut order: Vec<TaskIdx> = Vec::with_capacity(n);

    while let Some(idx) = queue.pop_front() {
        order.push(idx);

        for &dependent in &graph.dependents[idx as usize] {
            let degree = &mut in_degree[dependent as usize];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(dependent);
            }
        }
    }

    let excluded = if order.len() == n {
        Vec::new()
    } else {
        (0..n)
            .filter(|&i| in_degree[i] > 0)
            .map(|i| i as TaskIdx)
            .collect()
    };

    TopoOrder { order, excluded }
}
