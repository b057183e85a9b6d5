//! Core value types for flowsql
//!
//! This module contains the small vocabulary shared by node configurations
//! and code generation: comparison operators, join types, aggregate
//! functions, literal wrapping and the external context supplied by the
//! surrounding application.
//!
//! # Main Types
//!
//! - [`ExternalContext`] - Database and game identity used to resolve names
//! - [`ComparisonOp`] - Operators usable in filter and join conditions
//! - [`JoinType`] - Join flavours, defaulting to an inner join
//! - [`AggregateFunction`] - Functions available to aggregate nodes
//!
//! # Literals
//!
//! Filter values arrive as JSON values and are wrapped into query literals by
//! [`render_literal`]. Strings are single-quoted with embedded quotes doubled;
//! no other rewriting of predicates happens.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Read-only data supplied by the application for one compile call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalContext {
    /// Database holding the raw event table
    pub physical_database_name: String,

    /// Numeric game id; determines the namespace output views are created in
    pub numeric_game_identifier: u64,
}

impl ExternalContext {
    pub fn new(physical_database_name: impl Into<String>, numeric_game_identifier: u64) -> Self {
        Self {
            physical_database_name: physical_database_name.into(),
            numeric_game_identifier,
        }
    }
}

/// Comparison operator of a filter or join condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    #[default]
    #[serde(alias = "=", alias = "==")]
    Eq,
    #[serde(alias = "!=", alias = "<>")]
    Ne,
    #[serde(alias = "<")]
    Lt,
    #[serde(alias = "<=")]
    Le,
    #[serde(alias = ">")]
    Gt,
    #[serde(alias = ">=")]
    Ge,
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

impl ComparisonOp {
    /// Keyword or symbol as it appears in generated text
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Like => "LIKE",
            ComparisonOp::NotLike => "NOT LIKE",
            ComparisonOp::In => "IN",
            ComparisonOp::NotIn => "NOT IN",
            ComparisonOp::IsNull => "IS NULL",
            ComparisonOp::IsNotNull => "IS NOT NULL",
        }
    }

    /// Unary operators take no right-hand side
    pub fn is_unary(&self) -> bool {
        matches!(self, ComparisonOp::IsNull | ComparisonOp::IsNotNull)
    }

    /// Set operators expect a parenthesized list on the right-hand side
    pub fn is_set(&self) -> bool {
        matches!(self, ComparisonOp::In | ComparisonOp::NotIn)
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Join flavour of a join node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL OUTER JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner"),
            JoinType::Left => write!(f, "left"),
            JoinType::Right => write!(f, "right"),
            JoinType::Full => write!(f, "full"),
        }
    }
}

/// Aggregate function applied by an aggregate node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunction {
    Count,
    CountDistinct,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    /// Only a plain count can run without a field (`count(*)`).
    pub fn requires_field(&self) -> bool {
        !matches!(self, AggregateFunction::Count)
    }

    /// Render the function applied to `field`; a field-less count counts rows.
    pub fn apply(&self, field: Option<&str>) -> String {
        let arg = field.unwrap_or("*");
        match self {
            AggregateFunction::Count => format!("count({})", arg),
            AggregateFunction::CountDistinct => format!("count(DISTINCT {})", arg),
            AggregateFunction::Sum => format!("sum({})", arg),
            AggregateFunction::Avg => format!("avg({})", arg),
            AggregateFunction::Min => format!("min({})", arg),
            AggregateFunction::Max => format!("max({})", arg),
        }
    }
}

/// Quote a string as a single-quoted literal.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Wrap a JSON value into a query literal.
pub fn render_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_string(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_literal).collect();
            format!("({})", items.join(", "))
        }
        Value::Object(_) => quote_string(&value.to_string()),
    }
}
