//! Dependency graph construction.
//!
//! Converts the flat node and edge lists into an adjacency index keyed by
//! node id. The index keeps node-list order, which the scheduler relies on
//! for deterministic tie-breaking.

use crate::pipeline::id::NodeId;
use crate::pipeline::node::{Edge, Node};
use indexmap::IndexMap;

/// Upstream and downstream neighbours of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    /// Upstream node ids, in edge order
    pub dependencies: Vec<NodeId>,
    /// Target handle of the edge behind each entry of `dependencies`
    pub input_handles: Vec<Option<String>>,
    /// Downstream node ids, in edge order
    pub dependents: Vec<NodeId>,
}

/// Adjacency index built fresh for every compilation.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    entries: IndexMap<NodeId, Adjacency>,
    inert_edges: usize,
}

impl DependencyGraph {
    /// Build the index in O(V+E).
    ///
    /// Edges whose endpoints are not both present are dropped; they may
    /// reference nodes that are mid-deletion in the editor.
    pub fn build(nodes: &[Node], edges: &[Edge]) -> Self {
        let mut entries: IndexMap<NodeId, Adjacency> = IndexMap::with_capacity(nodes.len());
        for node in nodes {
            if entries.contains_key(&node.id) {
                tracing::warn!("Duplicate node id '{}', keeping first occurrence", node.id);
                continue;
            }
            entries.insert(node.id.clone(), Adjacency::default());
        }

        let mut inert_edges = 0;
        for edge in edges {
            if !entries.contains_key(&edge.source) || !entries.contains_key(&edge.target) {
                tracing::trace!(
                    "Dropping inert edge {} -> {}",
                    edge.source,
                    edge.target
                );
                inert_edges += 1;
                continue;
            }

            if let Some(source) = entries.get_mut(&edge.source) {
                source.dependents.push(edge.target.clone());
            }
            if let Some(target) = entries.get_mut(&edge.target) {
                target.dependencies.push(edge.source.clone());
                target.input_handles.push(edge.target_handle.clone());
            }
        }

        Self {
            entries,
            inert_edges,
        }
    }

    pub fn get(&self, id: &NodeId) -> Option<&Adjacency> {
        self.entries.get(id)
    }

    pub fn dependencies(&self, id: &NodeId) -> &[NodeId] {
        self.entries
            .get(id)
            .map(|a| a.dependencies.as_slice())
            .unwrap_or(&[])
    }

    pub fn dependents(&self, id: &NodeId) -> &[NodeId] {
        self.entries
            .get(id)
            .map(|a| a.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Node ids in node-list order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Adjacency)> {
        self.entries.iter()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of edges dropped because an endpoint was missing.
    pub fn inert_edges(&self) -> usize {
        self.inert_edges
    }

    /// Position of a node in node-list order.
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.entries.get_index_of(id)
    }
}
