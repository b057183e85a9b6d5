//! Topological scheduling (Kahn's algorithm).
//!
//! Ties between independent ready nodes are broken by node-list order so
//! repeated compiles of the same graph produce byte-identical output.

use crate::pipeline::error::PipelineError;
use crate::pipeline::graph::DependencyGraph;
use crate::pipeline::id::NodeId;
use std::collections::{HashMap, VecDeque};

/// Linearize an acyclic graph into one total order.
pub fn schedule(graph: &DependencyGraph) -> Result<Vec<NodeId>, PipelineError> {
    let mut in_degree: HashMap<&NodeId, usize> = graph
        .iter()
        .map(|(id, adj)| (id, adj.dependencies.len()))
        .collect();

    // Seed in node-list order
    let mut queue: VecDeque<&NodeId> = graph
        .node_ids()
        .filter(|id| in_degree.get(id).copied() == Some(0))
        .collect();
    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = queue.pop_front() {
        order.push(node.clone());

        for next in graph.dependents(node) {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    if order.len() != graph.len() {
        tracing::warn!(
            "Pipeline graph has a cycle! Only {} of {} nodes scheduled.",
            order.len(),
            graph.len()
        );
        return Err(PipelineError::Unschedulable {
            scheduled: order.len(),
            total: graph.len(),
        });
    }

    Ok(order)
}
