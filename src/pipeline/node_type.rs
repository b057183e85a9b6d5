//! Node kind enumeration.
//!
//! The kind set is closed: every kind has a fixed arity and a fixed port
//! layout, and every dispatch over it is an exhaustive match.

use crate::pipeline::port::{
    PortDescriptor, EVENT_PORTS, JOIN_PORTS, OUTPUT_PORTS, TRANSFORM_PORTS, UNION_ALL_PORTS,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of nodes that can be placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    // Source nodes
    /// Reads one game event stream.
    Event,

    // Transform nodes
    /// Concatenates two or more inputs.
    UnionAll,
    /// Joins exactly two inputs on configured conditions.
    Join,
    /// Restricts rows with a predicate list.
    Filter,
    /// Groups rows and applies aggregate functions.
    Aggregate,

    // Sink nodes
    /// Publishes its input as a named view.
    Output,
}

/// Number of upstream inputs a kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule", content = "count")]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

impl NodeType {
    /// Get the display name for this node type.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeType::Event => "Event",
            NodeType::UnionAll => "Union All",
            NodeType::Join => "Join",
            NodeType::Filter => "Filter",
            NodeType::Aggregate => "Aggregate",
            NodeType::Output => "Output",
        }
    }

    /// Get all available node types.
    pub fn all() -> &'static [NodeType] {
        &[
            NodeType::Event,
            NodeType::UnionAll,
            NodeType::Join,
            NodeType::Filter,
            NodeType::Aggregate,
            NodeType::Output,
        ]
    }

    /// Required upstream input count.
    pub fn arity(&self) -> Arity {
        match self {
            NodeType::Event => Arity::Exactly(0),
            NodeType::UnionAll => Arity::AtLeast(2),
            NodeType::Join => Arity::Exactly(2),
            NodeType::Filter | NodeType::Aggregate | NodeType::Output => Arity::Exactly(1),
        }
    }

    pub fn ports(&self) -> &'static [PortDescriptor] {
        match self {
            NodeType::Event => EVENT_PORTS,
            NodeType::UnionAll => UNION_ALL_PORTS,
            NodeType::Join => JOIN_PORTS,
            NodeType::Filter | NodeType::Aggregate => TRANSFORM_PORTS,
            NodeType::Output => OUTPUT_PORTS,
        }
    }

    /// A source has no input port (structurally defined, not edge-based).
    pub fn is_source(&self) -> bool {
        !self.ports().iter().any(PortDescriptor::is_input)
    }

    /// A sink has no output port (structurally defined, not edge-based).
    pub fn is_sink(&self) -> bool {
        !self.ports().iter().any(PortDescriptor::is_output)
    }

    /// Check if this node type is a transform node.
    pub fn is_transform(&self) -> bool {
        !self.is_source() && !self.is_sink()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
