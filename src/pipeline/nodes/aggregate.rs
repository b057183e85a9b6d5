//! Aggregate node — groups rows and applies aggregate functions.

use crate::config::CompilerSettings;
use crate::pipeline::error::NodeError;
use crate::pipeline::fragment::{derived_table, NodeMetadata, NodeOutput, Upstream};
use crate::pipeline::id::NodeId;
use crate::pipeline::node_type::NodeType;
use crate::types::AggregateFunction;
use serde::{Deserialize, Serialize};

/// `function(field) AS alias`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub function: AggregateFunction,
    /// Row count when absent (only meaningful for `count`)
    #[serde(default)]
    pub field: Option<String>,
    pub alias: String,
}

impl Aggregation {
    pub fn new(function: AggregateFunction, field: Option<&str>, alias: impl Into<String>) -> Self {
        Self {
            function,
            field: field.map(str::to_string),
            alias: alias.into(),
        }
    }

    /// A blank field counts as missing.
    fn field(&self) -> Option<&str> {
        self.field.as_deref().map(str::trim).filter(|f| !f.is_empty())
    }

    fn render(&self) -> String {
        format!("{} AS {}", self.function.apply(self.field()), self.alias)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AggregateConfig {
    pub group_by: Vec<String>,
    pub aggregations: Vec<Aggregation>,
}

impl AggregateConfig {
    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by.push(field.into());
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }
}

/// Arity (exactly one input) is checked by the caller.
pub(crate) fn compile(
    node_id: &NodeId,
    config: &AggregateConfig,
    input: &Upstream<'_>,
    settings: &CompilerSettings,
) -> Result<NodeOutput, NodeError> {
    if let Some(bad) = config
        .aggregations
        .iter()
        .find(|a| a.function.requires_field() && a.field().is_none())
    {
        tracing::debug!("Aggregation '{}' of node '{}' has no field", bad.alias, node_id);
        return Err(NodeError::missing_config(
            node_id,
            NodeType::Aggregate,
            "aggregate field",
        ));
    }

    let projection: Vec<String> = config
        .group_by
        .iter()
        .cloned()
        .chain(config.aggregations.iter().map(Aggregation::render))
        .collect();

    let select = if projection.is_empty() {
        "SELECT *".to_string()
    } else {
        format!(
            "SELECT\n{}",
            projection
                .iter()
                .map(|p| format!("    {}", p))
                .collect::<Vec<_>>()
                .join(",\n")
        )
    };

    let mut text = format!(
        "{}\nFROM {}",
        select,
        derived_table(input.text(), &settings.subquery_alias)
    );
    if !config.group_by.is_empty() {
        text.push_str(&format!("\nGROUP BY {}", config.group_by.join(", ")));
    }

    Ok(NodeOutput {
        kind: NodeType::Aggregate,
        text,
        metadata: NodeMetadata::Aggregate {
            group_by: config.group_by.clone(),
            aggregate_count: config.aggregations.len(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::nodes::test_support::{output_of, upstream};

    fn try_run(config: &AggregateConfig) -> Result<NodeOutput, NodeError> {
        let id = NodeId::from("f1");
        let out = output_of("SELECT a");
        compile(&"a1".into(), config, &upstream(&id, &out), &CompilerSettings::default())
    }

    fn run(config: &AggregateConfig) -> NodeOutput {
        try_run(config).unwrap()
    }

    #[test]
    fn test_group_by_with_aggregations() {
        let config = AggregateConfig::default()
            .group_by("server_id")
            .group_by("day")
            .with_aggregation(Aggregation::new(AggregateFunction::Count, None, "logins"))
            .with_aggregation(Aggregation::new(
                AggregateFunction::CountDistinct,
                Some("user_id"),
                "players",
            ));

        let out = run(&config);

        assert_eq!(
            out.text,
            "SELECT\n\
             \x20   server_id,\n\
             \x20   day,\n\
             \x20   count(*) AS logins,\n\
             \x20   count(DISTINCT user_id) AS players\n\
             FROM (\n    SELECT a\n) AS src\n\
             GROUP BY server_id, day"
        );
        assert_eq!(
            out.metadata,
            NodeMetadata::Aggregate {
                group_by: vec!["server_id".to_string(), "day".to_string()],
                aggregate_count: 2,
            }
        );
    }

    #[test]
    fn test_aggregations_without_group_by() {
        let config = AggregateConfig::default()
            .with_aggregation(Aggregation::new(AggregateFunction::Sum, Some("gold"), "total"));

        let out = run(&config);

        assert!(out.text.starts_with("SELECT\n    sum(gold) AS total\nFROM"));
        assert!(!out.text.contains("GROUP BY"));
    }

    #[test]
    fn test_nothing_configured_selects_all() {
        let out = run(&AggregateConfig::default());
        assert!(out.text.starts_with("SELECT *\nFROM ("));
    }

    #[test]
    fn test_fieldless_aggregations_other_than_count_fail() {
        for function in [
            AggregateFunction::CountDistinct,
            AggregateFunction::Sum,
            AggregateFunction::Avg,
            AggregateFunction::Min,
            AggregateFunction::Max,
        ] {
            for field in [None, Some("  ")] {
                let config = AggregateConfig::default()
                    .with_aggregation(Aggregation::new(function, field, "s"));

                assert_eq!(
                    try_run(&config).unwrap_err(),
                    NodeError::MissingConfig {
                        node_id: "a1".into(),
                        kind: NodeType::Aggregate,
                        field: "aggregate field".to_string(),
                    },
                    "{:?} with field {:?}",
                    function,
                    field
                );
            }
        }
    }

    #[test]
    fn test_blank_count_field_counts_rows() {
        let config = AggregateConfig::default()
            .with_aggregation(Aggregation::new(AggregateFunction::Count, Some(" "), "n"));
        assert!(run(&config).text.starts_with("SELECT\n    count(*) AS n\nFROM"));
    }
}
