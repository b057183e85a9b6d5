//! Join node — joins a left and a right input.
//!
//! Sides are taken from the `left`/`right` target handles when both are
//! present on the incoming edges, otherwise from dependency order. At least
//! one condition is required; all conditions are combined with `AND`.

use crate::config::CompilerSettings;
use crate::pipeline::error::NodeError;
use crate::pipeline::fragment::{derived_table, NodeMetadata, NodeOutput, Upstream};
use crate::pipeline::id::NodeId;
use crate::pipeline::node_type::NodeType;
use crate::pipeline::port::{LEFT_HANDLE, RIGHT_HANDLE};
use crate::types::{ComparisonOp, JoinType};
use serde::{Deserialize, Serialize};

/// `left <op> right`, both table-qualified references such as `l.user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCondition {
    pub left: String,
    #[serde(default)]
    pub operator: ComparisonOp,
    pub right: String,
}

impl JoinCondition {
    pub fn equals(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            operator: ComparisonOp::Eq,
            right: right.into(),
        }
    }

    fn render(&self) -> String {
        if self.operator.is_unary() {
            format!("{} {}", self.left, self.operator)
        } else {
            format!("{} {} {}", self.left, self.operator, self.right)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JoinConfig {
    /// Inner join when unset
    pub join_type: Option<JoinType>,
    pub conditions: Vec<JoinCondition>,
}

impl JoinConfig {
    pub fn new(join_type: JoinType) -> Self {
        Self {
            join_type: Some(join_type),
            conditions: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: JoinCondition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// Order the two inputs as (left, right).
fn sides<'i, 'a>(inputs: &'i [Upstream<'a>]) -> (&'i Upstream<'a>, &'i Upstream<'a>) {
    let by_handle = |name: &str| inputs.iter().find(|i| i.handle == Some(name));
    match (by_handle(LEFT_HANDLE), by_handle(RIGHT_HANDLE)) {
        (Some(left), Some(right)) => (left, right),
        _ => (&inputs[0], &inputs[1]),
    }
}

/// Arity (exactly two inputs) is checked by the caller.
pub(crate) fn compile(
    node_id: &NodeId,
    config: &JoinConfig,
    inputs: &[Upstream<'_>],
    settings: &CompilerSettings,
) -> Result<NodeOutput, NodeError> {
    if config.conditions.is_empty() {
        return Err(NodeError::missing_config(
            node_id,
            NodeType::Join,
            "join condition",
        ));
    }

    let join_type = config.join_type.unwrap_or_default();
    let (left, right) = sides(inputs);
    let on = config
        .conditions
        .iter()
        .map(JoinCondition::render)
        .collect::<Vec<_>>()
        .join(" AND ");

    let text = format!(
        "SELECT *\nFROM {}\n{} {}\nON {}",
        derived_table(left.text(), &settings.left_alias),
        join_type.keyword(),
        derived_table(right.text(), &settings.right_alias),
        on
    );

    Ok(NodeOutput {
        kind: NodeType::Join,
        text,
        metadata: NodeMetadata::Join {
            join_type,
            condition_count: config.conditions.len(),
        },
    })
}
