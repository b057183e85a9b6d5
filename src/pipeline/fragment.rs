//! Generated fragments.
//!
//! A [`NodeOutput`] is what one node compiles to. Downstream nodes receive
//! their upstream outputs as [`Upstream`] references and splice the text
//! into their own fragment.

use crate::pipeline::id::NodeId;
use crate::pipeline::node_type::NodeType;
use crate::types::JoinType;
use serde::{Deserialize, Serialize};

/// Result of compiling one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOutput {
    pub kind: NodeType,
    /// Generated query text
    pub text: String,
    pub metadata: NodeMetadata,
}

/// Normalized, kind-specific facts about a compiled node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeMetadata {
    Event {
        event_name: Option<String>,
        field_count: usize,
        /// The standard column set was emitted because no field was configured
        fallback: bool,
    },
    UnionAll {
        input_count: usize,
    },
    Join {
        join_type: JoinType,
        condition_count: usize,
    },
    Filter {
        condition_count: usize,
    },
    Aggregate {
        group_by: Vec<String>,
        aggregate_count: usize,
    },
    Output {
        view_name: String,
        namespace: String,
    },
}

/// One upstream output as seen by the node consuming it.
#[derive(Debug, Clone, Copy)]
pub struct Upstream<'a> {
    pub node_id: &'a NodeId,
    /// Target handle of the connecting edge
    pub handle: Option<&'a str>,
    pub output: &'a NodeOutput,
}

impl<'a> Upstream<'a> {
    pub fn text(&self) -> &'a str {
        &self.output.text
    }
}

/// Indent every non-empty line by four spaces.
pub(crate) fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("    {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `FROM (\n    <text>\n) AS <alias>`
pub(crate) fn derived_table(text: &str, alias: &str) -> String {
    format!("(\n{}\n) AS {}", indent(text), alias)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent("a\n\nb"), "    a\n\n    b");
    }

    #[test]
    fn test_derived_table() {
        assert_eq!(
            derived_table("SELECT 1", "src"),
            "(\n    SELECT 1\n) AS src"
        );
    }
}
