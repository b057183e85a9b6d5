//! UnionAll node — concatenates two or more inputs.

use crate::pipeline::error::NodeError;
use crate::pipeline::fragment::{NodeMetadata, NodeOutput, Upstream};
use crate::pipeline::node_type::NodeType;

const SEPARATOR: &str = "\nUNION ALL\n";

/// Arity (at least two inputs) is checked by the caller.
pub(crate) fn compile(inputs: &[Upstream<'_>]) -> Result<NodeOutput, NodeError> {
    let blocks: Vec<String> = inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            format!(
                "-- input {}: {} ({})\n{}",
                i + 1,
                input.output.kind,
                input.node_id,
                input.text()
            )
        })
        .collect();

    Ok(NodeOutput {
        kind: NodeType::UnionAll,
        text: blocks.join(SEPARATOR),
        metadata: NodeMetadata::UnionAll {
            input_count: inputs.len(),
        },
    })
}
