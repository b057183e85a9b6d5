//! Node and edge model of the pipeline graph.
//!
//! Nodes and edges are flat collections addressed by id. A node's kind is a
//! closed enum; each variant carries its own typed configuration, so a
//! mismatched configuration shape is rejected when a document is decoded
//! and never reaches the compiler.
//!
//! On the wire a node looks like
//! `{"id": "e1", "kind": "event", "config": {"fields": [...]}}`.

use crate::pipeline::id::{EdgeId, NodeId};
use crate::pipeline::node_type::NodeType;
use serde::{Deserialize, Serialize};

// Per-kind configuration types (defined in nodes/ submodule).
use crate::pipeline::nodes::{AggregateConfig, EventConfig, FilterConfig, JoinConfig, OutputConfig};

/// Enum dispatch over the closed set of node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "config", rename_all = "snake_case")]
pub enum NodeKind {
    Event(EventConfig),
    UnionAll,
    Join(JoinConfig),
    Filter(FilterConfig),
    Aggregate(AggregateConfig),
    Output(OutputConfig),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Event(_) => NodeType::Event,
            NodeKind::UnionAll => NodeType::UnionAll,
            NodeKind::Join(_) => NodeType::Join,
            NodeKind::Filter(_) => NodeType::Filter,
            NodeKind::Aggregate(_) => NodeType::Aggregate,
            NodeKind::Output(_) => NodeType::Output,
        }
    }
}

/// A vertex of the pipeline graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn event(id: impl Into<NodeId>, config: EventConfig) -> Self {
        Self::new(id, NodeKind::Event(config))
    }

    pub fn union_all(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::UnionAll)
    }

    pub fn join(id: impl Into<NodeId>, config: JoinConfig) -> Self {
        Self::new(id, NodeKind::Join(config))
    }

    pub fn filter(id: impl Into<NodeId>, config: FilterConfig) -> Self {
        Self::new(id, NodeKind::Filter(config))
    }

    pub fn aggregate(id: impl Into<NodeId>, config: AggregateConfig) -> Self {
        Self::new(id, NodeKind::Aggregate(config))
    }

    pub fn output(id: impl Into<NodeId>, config: OutputConfig) -> Self {
        Self::new(id, NodeKind::Output(config))
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }
}

/// A directed dependency `source -> target`.
///
/// Handles name the ports the edge is attached to; only nodes with more than
/// one distinguishable input (the two sides of a join) look at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EdgeId>,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, alias = "sourceHandle", skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, alias = "targetHandle", skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_target_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }

    /// Whether either endpoint is `id`.
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::nodes::FieldSource;

    #[test]
    fn test_node_wire_format() {
        let json = r#"{
            "id": "e1",
            "kind": "event",
            "config": {
                "event_name": "login",
                "fields": [
                    {"name": "role_id"},
                    {"name": "channel", "source": {"from": "parameter", "json_path": "channel"}}
                ]
            }
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.id, NodeId::from("e1"));
        let NodeKind::Event(config) = &node.kind else {
            panic!("expected an event node");
        };
        assert_eq!(config.event_name.as_deref(), Some("login"));
        assert_eq!(config.fields[0].source, FieldSource::Column);
        assert_eq!(
            config.fields[1].source,
            FieldSource::Parameter {
                json_path: "channel".to_string()
            }
        );
    }

    #[test]
    fn test_union_all_needs_no_config() {
        let node: Node = serde_json::from_str(r#"{"id": "u1", "kind": "union_all"}"#).unwrap();
        assert_eq!(node.node_type(), NodeType::UnionAll);
    }

    #[test]
    fn test_mismatched_config_is_rejected() {
        let json = r#"{"id": "j1", "kind": "join", "config": {"conditions": "nope"}}"#;
        assert!(serde_json::from_str::<Node>(json).is_err());
    }

    #[test]
    fn test_edge_accepts_camel_case_handles() {
        let json = r#"{"source": "a", "target": "j", "targetHandle": "left"}"#;
        let edge: Edge = serde_json::from_str(json).unwrap();
        assert_eq!(edge.target_handle.as_deref(), Some("left"));
        assert!(edge.touches(&NodeId::from("a")));
        assert!(!edge.touches(&NodeId::from("b")));
    }
}
