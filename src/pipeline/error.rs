//! Pipeline-specific error types.
//!
//! Two layers: [`PipelineError`] aborts a whole compile before any node is
//! touched, while [`NodeError`] is recorded against one node and compilation
//! of independent branches carries on.

use crate::pipeline::id::NodeId;
use crate::pipeline::node_type::{Arity, NodeType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural errors that stop compilation of the whole graph.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineError {
    #[error("Cycle detected in pipeline graph: {}", format_cycles(.cycles))]
    CycleDetected { cycles: Vec<Vec<NodeId>> },

    #[error("Only {scheduled} of {total} nodes could be scheduled")]
    Unschedulable { scheduled: usize, total: usize },
}

/// Validation failure of a single node.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum NodeError {
    #[error("{kind} node '{node_id}' expects {expected} upstream input(s), found {found}")]
    Arity {
        node_id: NodeId,
        kind: NodeType,
        expected: Arity,
        found: usize,
    },

    #[error("{kind} node '{node_id}' is missing required configuration: {field}")]
    MissingConfig {
        node_id: NodeId,
        kind: NodeType,
        field: String,
    },

    #[error("Node '{node_id}' skipped because upstream node '{upstream}' failed")]
    Skipped { node_id: NodeId, upstream: NodeId },
}

impl NodeError {
    pub fn node_id(&self) -> &NodeId {
        match self {
            NodeError::Arity { node_id, .. }
            | NodeError::MissingConfig { node_id, .. }
            | NodeError::Skipped { node_id, .. } => node_id,
        }
    }

    pub fn missing_config(node_id: &NodeId, kind: NodeType, field: &str) -> Self {
        NodeError::MissingConfig {
            node_id: node_id.clone(),
            kind,
            field: field.to_string(),
        }
    }
}

fn format_cycles(cycles: &[Vec<NodeId>]) -> String {
    cycles
        .iter()
        .map(|cycle| {
            cycle
                .iter()
                .map(NodeId::as_str)
                .collect::<Vec<_>>()
                .join(" -> ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}
