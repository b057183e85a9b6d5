//! Per-kind node compilers.
//!
//! Each kind owns its configuration type and a pure `compile` function
//! mapping (configuration, upstream outputs, context, settings) to a
//! [`NodeOutput`]. Expected validation failures come back as [`NodeError`]
//! values; nothing here panics on user input.

pub mod aggregate;
pub mod event;
pub mod filter;
pub mod join;
pub mod output;
pub mod union_all;

pub use aggregate::{AggregateConfig, Aggregation};
pub use event::{EventConfig, EventField, FieldSource};
pub use filter::{FilterCondition, FilterConfig};
pub use join::{JoinCondition, JoinConfig};
pub use output::OutputConfig;

use crate::config::CompilerSettings;
use crate::pipeline::error::NodeError;
use crate::pipeline::fragment::{NodeOutput, Upstream};
use crate::pipeline::id::NodeId;
use crate::pipeline::node::{Node, NodeKind};
use crate::pipeline::node_type::NodeType;
use crate::types::ExternalContext;

/// Compile one node. Exhaustive over the closed kind set.
pub fn compile_node(
    node: &Node,
    inputs: &[Upstream<'_>],
    ctx: &ExternalContext,
    settings: &CompilerSettings,
) -> Result<NodeOutput, NodeError> {
    check_arity(&node.id, node.node_type(), inputs.len())?;

    match &node.kind {
        NodeKind::Event(config) => event::compile(&node.id, config, ctx, settings),
        NodeKind::UnionAll => union_all::compile(inputs),
        NodeKind::Join(config) => join::compile(&node.id, config, inputs, settings),
        NodeKind::Filter(config) => filter::compile(&node.id, config, &inputs[0], settings),
        NodeKind::Aggregate(config) => {
            aggregate::compile(&node.id, config, &inputs[0], settings)
        }
        NodeKind::Output(config) => output::compile(&node.id, config, &inputs[0], ctx, settings),
    }
}

pub(crate) fn check_arity(node_id: &NodeId, kind: NodeType, found: usize) -> Result<(), NodeError> {
    let expected = kind.arity();
    if expected.accepts(found) {
        Ok(())
    } else {
        Err(NodeError::Arity {
            node_id: node_id.clone(),
            kind,
            expected,
            found,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::pipeline::fragment::NodeMetadata;

    pub fn ctx() -> ExternalContext {
        ExternalContext::new("game_db", 42)
    }

    pub fn output_of(text: &str) -> NodeOutput {
        NodeOutput {
            kind: NodeType::Event,
            text: text.to_string(),
            metadata: NodeMetadata::Event {
                event_name: None,
                field_count: 1,
                fallback: false,
            },
        }
    }

    pub fn upstream<'a>(id: &'a NodeId, output: &'a NodeOutput) -> Upstream<'a> {
        Upstream {
            node_id: id,
            handle: None,
            output,
        }
    }
}
