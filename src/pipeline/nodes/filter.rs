//! Filter node — keeps rows matching every condition.
//!
//! Wraps its single input as a derived table and appends a `WHERE` clause.
//! Conditions are combined with `AND`; an empty list degrades to an
//! always-true predicate (passthrough mode).

use crate::config::CompilerSettings;
use crate::pipeline::error::NodeError;
use crate::pipeline::fragment::{derived_table, NodeMetadata, NodeOutput, Upstream};
use crate::pipeline::id::NodeId;
use crate::pipeline::node_type::NodeType;
use crate::types::{render_literal, ComparisonOp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ALWAYS_TRUE: &str = "1 = 1";

/// `field <op> <literal>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    #[serde(default)]
    pub operator: ComparisonOp,
    /// Ignored by `IS NULL` / `IS NOT NULL`
    #[serde(default)]
    pub value: Value,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: ComparisonOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// `IN` / `NOT IN` against nothing has no valid rendering.
    fn has_empty_set(&self) -> bool {
        self.operator.is_set()
            && match &self.value {
                Value::Array(items) => items.is_empty(),
                Value::Null => true,
                _ => false,
            }
    }

    fn render(&self) -> String {
        if self.operator.is_unary() {
            return format!("{} {}", self.field, self.operator);
        }

        let literal = match (&self.value, self.operator.is_set()) {
            // A scalar on the right of IN still needs parentheses
            (Value::Array(_), _) | (_, false) => render_literal(&self.value),
            (scalar, true) => format!("({})", render_literal(scalar)),
        };
        format!("{} {} {}", self.field, self.operator, literal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterConfig {
    pub conditions: Vec<FilterCondition>,
}

impl FilterConfig {
    pub fn with_condition(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Check if in passthrough mode (no filtering).
    pub fn is_passthrough(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Arity (exactly one input) is checked by the caller.
pub(crate) fn compile(
    node_id: &NodeId,
    config: &FilterConfig,
    input: &Upstream<'_>,
    settings: &CompilerSettings,
) -> Result<NodeOutput, NodeError> {
    if config.conditions.iter().any(FilterCondition::has_empty_set) {
        return Err(NodeError::missing_config(node_id, NodeType::Filter, "IN list"));
    }

    let predicate = if config.is_passthrough() {
        ALWAYS_TRUE.to_string()
    } else {
        config
            .conditions
            .iter()
            .map(FilterCondition::render)
            .collect::<Vec<_>>()
            .join(" AND ")
    };

    let text = format!(
        "SELECT *\nFROM {}\nWHERE {}",
        derived_table(input.text(), &settings.subquery_alias),
        predicate
    );

    Ok(NodeOutput {
        kind: NodeType::Filter,
        text,
        metadata: NodeMetadata::Filter {
            condition_count: config.conditions.len(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::nodes::test_support::{output_of, upstream};
    use serde_json::json;

    fn try_run(config: &FilterConfig) -> Result<NodeOutput, NodeError> {
        let id = NodeId::from("e1");
        let out = output_of("SELECT a");
        compile(&"f1".into(), config, &upstream(&id, &out), &CompilerSettings::default())
    }

    fn run(config: &FilterConfig) -> NodeOutput {
        try_run(config).unwrap()
    }

    #[test]
    fn test_empty_conditions_pass_everything() {
        let out = run(&FilterConfig::default());
        assert_eq!(out.text, "SELECT *\nFROM (\n    SELECT a\n) AS src\nWHERE 1 = 1");
        assert_eq!(out.metadata, NodeMetadata::Filter { condition_count: 0 });
    }

    #[test]
    fn test_conditions_joined_with_and() {
        let config = FilterConfig::default()
            .with_condition(FilterCondition::new("level", ComparisonOp::Ge, 10))
            .with_condition(FilterCondition::new("name", ComparisonOp::Eq, "O'Neil"));

        let out = run(&config);

        assert!(out.text.ends_with("WHERE level >= 10 AND name = 'O''Neil'"));
    }

    #[test]
    fn test_set_and_null_operators() {
        let config = FilterConfig::default()
            .with_condition(FilterCondition::new("region", ComparisonOp::In, json!(["eu", "na"])))
            .with_condition(FilterCondition::new("tier", ComparisonOp::NotIn, 3))
            .with_condition(FilterCondition::new("deleted_at", ComparisonOp::IsNull, Value::Null));

        let out = run(&config);

        assert!(out
            .text
            .ends_with("WHERE region IN ('eu', 'na') AND tier NOT IN (3) AND deleted_at IS NULL"));
    }

    #[test]
    fn test_condition_from_json() {
        let condition: FilterCondition =
            serde_json::from_str(r#"{"field": "score", "operator": ">", "value": 9.5}"#).unwrap();
        assert_eq!(condition.render(), "score > 9.5");
    }

    #[test]
    fn test_empty_in_list_fails() {
        for (op, value) in [
            (ComparisonOp::In, json!([])),
            (ComparisonOp::NotIn, json!([])),
            (ComparisonOp::In, Value::Null),
        ] {
            let config = FilterConfig::default()
                .with_condition(FilterCondition::new("level", ComparisonOp::Ge, 10))
                .with_condition(FilterCondition::new("a", op, value));

            assert_eq!(
                try_run(&config).unwrap_err(),
                NodeError::MissingConfig {
                    node_id: "f1".into(),
                    kind: NodeType::Filter,
                    field: "IN list".to_string(),
                }
            );
        }
    }

    #[test]
    fn test_equality_with_null_is_not_a_set() {
        let config = FilterConfig::default()
            .with_condition(FilterCondition::new("a", ComparisonOp::Eq, Value::Null));
        assert!(run(&config).text.ends_with("WHERE a = NULL"));
    }
}
