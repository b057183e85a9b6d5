//! Cascade deletion.
//!
//! Deleting a node removes every edge touching it. An output node that loses
//! its last incoming edge this way is an orphaned sink and is removed as
//! well, repeatedly, until none remain. Output nodes that were already
//! isolated before the call are left alone.
//!
//! [`estimate_cascade_impact`] runs the same planning pass without building
//! a new graph, for confirmation prompts.

use crate::pipeline::id::NodeId;
use crate::pipeline::node::{Edge, Node};
use crate::pipeline::node_type::NodeType;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Counts of everything a cascade deletion removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CascadeSummary {
    /// Requested nodes that existed
    pub direct_nodes: usize,
    /// Edges touching the requested nodes
    pub direct_edges: usize,
    /// Orphaned sinks removed as a consequence
    pub cascaded_nodes: usize,
    /// Edges touching the orphaned sinks
    pub cascaded_edges: usize,
}

impl CascadeSummary {
    pub fn total_nodes(&self) -> usize {
        self.direct_nodes + self.cascaded_nodes
    }

    pub fn total_edges(&self) -> usize {
        self.direct_edges + self.cascaded_edges
    }

    pub fn is_empty(&self) -> bool {
        self.total_nodes() == 0 && self.total_edges() == 0
    }
}

/// Graph left after a cascade deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeOutcome {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub summary: CascadeSummary,
}

/// What to remove, by position in the input slices.
struct CascadePlan {
    removed_nodes: HashSet<NodeId>,
    removed_edges: Vec<bool>,
    summary: CascadeSummary,
}

impl CascadePlan {
    fn new(edge_count: usize) -> Self {
        Self {
            removed_nodes: HashSet::new(),
            removed_edges: vec![false; edge_count],
            summary: CascadeSummary::default(),
        }
    }

    /// Remove `id` and its edges. Returns (node entries, edges) removed.
    fn remove(&mut self, id: &NodeId, nodes: &[Node], edges: &[Edge]) -> (usize, usize) {
        if !self.removed_nodes.insert(id.clone()) {
            return (0, 0);
        }

        let node_count = nodes.iter().filter(|n| &n.id == id).count();
        let mut edge_count = 0;
        for (removed, edge) in self.removed_edges.iter_mut().zip(edges) {
            if !*removed && edge.touches(id) {
                *removed = true;
                edge_count += 1;
            }
        }
        (node_count, edge_count)
    }

    /// Output nodes that had incoming edges and have none left.
    fn orphaned_sinks(
        &self,
        nodes: &[Node],
        edges: &[Edge],
        had_incoming: &HashSet<&NodeId>,
    ) -> Vec<NodeId> {
        let mut incoming: HashMap<&NodeId, usize> = HashMap::new();
        for (edge, removed) in edges.iter().zip(&self.removed_edges) {
            if !removed {
                *incoming.entry(&edge.target).or_default() += 1;
            }
        }

        let mut orphans: Vec<NodeId> = Vec::new();
        for node in nodes {
            if node.node_type() == NodeType::Output
                && !self.removed_nodes.contains(&node.id)
                && had_incoming.contains(&node.id)
                && !incoming.contains_key(&node.id)
                && !orphans.contains(&node.id)
            {
                orphans.push(node.id.clone());
            }
        }
        orphans
    }
}

fn plan(targets: &[NodeId], nodes: &[Node], edges: &[Edge]) -> CascadePlan {
    let mut plan = CascadePlan::new(edges.len());
    let had_incoming: HashSet<&NodeId> = edges.iter().map(|e| &e.target).collect();

    for id in targets {
        if !nodes.iter().any(|n| &n.id == id) {
            tracing::debug!("Cascade target '{}' not in graph, ignoring", id);
            continue;
        }
        let (removed_nodes, removed_edges) = plan.remove(id, nodes, edges);
        plan.summary.direct_nodes += removed_nodes;
        plan.summary.direct_edges += removed_edges;
    }

    loop {
        let orphans = plan.orphaned_sinks(nodes, edges, &had_incoming);
        if orphans.is_empty() {
            break;
        }
        for id in &orphans {
            tracing::debug!("Output node '{}' orphaned by deletion", id);
            let (removed_nodes, removed_edges) = plan.remove(id, nodes, edges);
            plan.summary.cascaded_nodes += removed_nodes;
            plan.summary.cascaded_edges += removed_edges;
        }
    }

    plan
}

/// Delete `targets` and every sink orphaned by the deletion.
///
/// Ids not present in `nodes` are ignored. Relative order of the remaining
/// nodes and edges is preserved.
pub fn cascade_delete(targets: &[NodeId], nodes: Vec<Node>, edges: Vec<Edge>) -> CascadeOutcome {
    let plan = plan(targets, &nodes, &edges);

    let nodes: Vec<Node> = nodes
        .into_iter()
        .filter(|n| !plan.removed_nodes.contains(&n.id))
        .collect();
    let edges: Vec<Edge> = edges
        .into_iter()
        .zip(plan.removed_edges)
        .filter_map(|(edge, removed)| (!removed).then_some(edge))
        .collect();

    let summary = plan.summary;
    if !summary.is_empty() {
        tracing::info!(
            "Deleted {} nodes and {} edges ({} nodes cascaded)",
            summary.total_nodes(),
            summary.total_edges(),
            summary.cascaded_nodes
        );
    }

    CascadeOutcome {
        nodes,
        edges,
        summary,
    }
}

/// Summary [`cascade_delete`] would report, without deleting anything.
pub fn estimate_cascade_impact(targets: &[NodeId], nodes: &[Node], edges: &[Edge]) -> CascadeSummary {
    plan(targets, nodes, edges).summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::nodes::{EventConfig, FilterConfig, OutputConfig};
    use proptest::prelude::*;

    fn ids(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_deleting_sole_input_cascades_to_output() {
        let nodes = vec![
            Node::event("e1", EventConfig::default()),
            Node::output("o1", OutputConfig::named("v1")),
        ];
        let edges = vec![Edge::new("e1", "o1")];

        let outcome = cascade_delete(&["e1".into()], nodes, edges);

        assert!(outcome.nodes.is_empty());
        assert!(outcome.edges.is_empty());
        assert_eq!(
            outcome.summary,
            CascadeSummary {
                direct_nodes: 1,
                direct_edges: 1,
                cascaded_nodes: 1,
                cascaded_edges: 0,
            }
        );
    }

    #[test]
    fn test_output_with_remaining_input_survives() {
        let nodes = vec![
            Node::event("e1", EventConfig::default()),
            Node::event("e2", EventConfig::default()),
            Node::union_all("u1"),
            Node::output("o1", OutputConfig::named("v1")),
        ];
        let edges = vec![
            Edge::new("e1", "u1"),
            Edge::new("e2", "u1"),
            Edge::new("u1", "o1"),
        ];

        let outcome = cascade_delete(&["e1".into()], nodes, edges);

        assert_eq!(ids(&outcome.nodes), vec!["e2", "u1", "o1"]);
        assert_eq!(outcome.edges.len(), 2);
        assert_eq!(outcome.summary.cascaded_nodes, 0);
    }

    #[test]
    fn test_only_outputs_cascade() {
        // The filter loses its input but is not a sink, so it stays.
        let nodes = vec![
            Node::event("e1", EventConfig::default()),
            Node::filter("f1", FilterConfig::default()),
            Node::output("o1", OutputConfig::named("v1")),
        ];
        let edges = vec![Edge::new("e1", "f1"), Edge::new("f1", "o1")];

        let outcome = cascade_delete(&["e1".into()], nodes, edges);

        assert_eq!(ids(&outcome.nodes), vec!["f1", "o1"]);
        assert_eq!(outcome.summary.direct_edges, 1);
        assert_eq!(outcome.summary.cascaded_nodes, 0);
    }

    #[test]
    fn test_isolated_output_is_untouched() {
        let nodes = vec![
            Node::event("e1", EventConfig::default()),
            Node::output("o1", OutputConfig::named("v1")),
            Node::output("lonely", OutputConfig::named("v2")),
        ];
        let edges = vec![Edge::new("e1", "o1")];

        let outcome = cascade_delete(&["e1".into()], nodes, edges);

        assert_eq!(ids(&outcome.nodes), vec!["lonely"]);
        assert_eq!(outcome.summary.cascaded_nodes, 1);
    }

    #[test]
    fn test_cascade_repeats_until_stable() {
        // Outputs chained by an (unusual) output-to-output edge.
        let nodes = vec![
            Node::event("e1", EventConfig::default()),
            Node::output("o1", OutputConfig::named("v1")),
            Node::output("o2", OutputConfig::named("v2")),
        ];
        let edges = vec![Edge::new("e1", "o1"), Edge::new("o1", "o2")];

        let outcome = cascade_delete(&["e1".into()], nodes, edges);

        assert!(outcome.nodes.is_empty());
        assert_eq!(outcome.summary.cascaded_nodes, 2);
        assert_eq!(outcome.summary.cascaded_edges, 1);
    }

    #[test]
    fn test_unknown_and_repeated_targets() {
        let nodes = vec![Node::event("e1", EventConfig::default())];

        let outcome = cascade_delete(&["missing".into(), "e1".into(), "e1".into()], nodes, vec![]);

        assert!(outcome.nodes.is_empty());
        assert_eq!(outcome.summary.direct_nodes, 1);
    }

    #[test]
    fn test_estimate_matches_delete() {
        let nodes = vec![
            Node::event("e1", EventConfig::default()),
            Node::filter("f1", FilterConfig::default()),
            Node::output("o1", OutputConfig::named("v1")),
            Node::output("o2", OutputConfig::named("v2")),
        ];
        let edges = vec![
            Edge::new("e1", "f1"),
            Edge::new("f1", "o1"),
            Edge::new("e1", "o2"),
        ];
        let targets = vec![NodeId::from("f1")];

        let estimate = estimate_cascade_impact(&targets, &nodes, &edges);
        let outcome = cascade_delete(&targets, nodes.clone(), edges.clone());

        assert_eq!(estimate, outcome.summary);
        assert_eq!(estimate.total_nodes(), 2);
        // The dry run left its inputs alone
        assert_eq!(nodes.len(), 4);
        assert_eq!(edges.len(), 3);
    }

    fn arb_graph() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>, Vec<NodeId>)> {
        (2usize..10).prop_flat_map(|n| {
            let kinds = prop::collection::vec(any::<bool>(), n);
            let edges = prop::collection::vec((0..n, 0..n), 0..n * 2);
            let targets = prop::collection::vec(0..n, 1..3);
            (kinds, edges, targets).prop_map(|(kinds, pairs, targets)| {
                let nodes: Vec<Node> = kinds
                    .iter()
                    .enumerate()
                    .map(|(i, is_output)| {
                        let id = format!("n{}", i);
                        if *is_output {
                            Node::output(id, OutputConfig::named("v"))
                        } else {
                            Node::filter(id, FilterConfig::default())
                        }
                    })
                    .collect();
                let edges = pairs
                    .into_iter()
                    .map(|(a, b)| Edge::new(format!("n{}", a), format!("n{}", b)))
                    .collect();
                let targets = targets.into_iter().map(|i| NodeId::from(format!("n{}", i))).collect();
                (nodes, edges, targets)
            })
        })
    }

    proptest! {
        #[test]
        fn prop_no_orphaned_sink_survives((nodes, edges, targets) in arb_graph()) {
            let had_incoming: HashSet<NodeId> = edges.iter().map(|e| e.target.clone()).collect();
            let before = (nodes.len(), edges.len());

            let outcome = cascade_delete(&targets, nodes, edges);

            for node in &outcome.nodes {
                prop_assert!(!targets.contains(&node.id));
                if node.node_type() == NodeType::Output && had_incoming.contains(&node.id) {
                    prop_assert!(outcome.edges.iter().any(|e| e.target == node.id));
                }
            }
            for edge in &outcome.edges {
                prop_assert!(outcome.nodes.iter().any(|n| n.id == edge.source));
                prop_assert!(outcome.nodes.iter().any(|n| n.id == edge.target));
            }
            prop_assert_eq!(before.0 - outcome.nodes.len(), outcome.summary.total_nodes());
            prop_assert_eq!(before.1 - outcome.edges.len(), outcome.summary.total_edges());
        }
    }
}
