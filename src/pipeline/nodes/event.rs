//! Event node — selects fields of one event stream.
//!
//! The source relation is the configured events table inside the context's
//! physical database. A field reads either a plain column or a JSON path of
//! the parameters column. Without configured fields the standard columns are
//! emitted so the pipeline still produces a usable projection.

use crate::config::CompilerSettings;
use crate::pipeline::error::NodeError;
use crate::pipeline::fragment::{NodeMetadata, NodeOutput};
use crate::pipeline::id::NodeId;
use crate::pipeline::node_type::NodeType;
use crate::types::{quote_string, ExternalContext};
use serde::{Deserialize, Serialize};

/// Where a field's value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum FieldSource {
    #[default]
    Column,
    Parameter { json_path: String },
}

/// One projected field of an event node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventField {
    /// Column name, or output alias for parameter fields
    pub name: String,
    #[serde(default)]
    pub source: FieldSource,
}

impl EventField {
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Column,
        }
    }

    pub fn parameter(name: impl Into<String>, json_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Parameter {
                json_path: json_path.into(),
            },
        }
    }

    fn render(&self, parameters_column: &str) -> String {
        match &self.source {
            FieldSource::Column => self.name.clone(),
            FieldSource::Parameter { json_path } => format!(
                "JSON_VALUE({}, {}) AS {}",
                parameters_column,
                quote_string(&normalize_path(json_path)),
                self.name
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EventConfig {
    pub event_name: Option<String>,
    pub fields: Vec<EventField>,
}

impl EventConfig {
    pub fn new(event_name: impl Into<String>) -> Self {
        Self {
            event_name: Some(event_name.into()),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: EventField) -> Self {
        self.fields.push(field);
        self
    }
}

/// `channel` → `$.channel`; paths already rooted at `$` are kept.
fn normalize_path(path: &str) -> String {
    if path.starts_with('$') {
        path.to_string()
    } else {
        format!("$.{}", path)
    }
}

pub(crate) fn compile(
    node_id: &NodeId,
    config: &EventConfig,
    ctx: &ExternalContext,
    settings: &CompilerSettings,
) -> Result<NodeOutput, NodeError> {
    let fallback = config.fields.is_empty();
    let projection: Vec<String> = if fallback {
        tracing::debug!(
            "Event node '{}' has no fields, using {} standard columns",
            node_id,
            settings.fallback_columns.len()
        );
        settings.fallback_columns.clone()
    } else {
        config
            .fields
            .iter()
            .map(|f| f.render(&settings.parameters_column))
            .collect()
    };

    let mut text = format!(
        "SELECT\n{}\nFROM {}.{}",
        projection
            .iter()
            .map(|p| format!("    {}", p))
            .collect::<Vec<_>>()
            .join(",\n"),
        ctx.physical_database_name,
        settings.events_table
    );

    let event_name = config
        .event_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    if let Some(name) = event_name {
        text.push_str(&format!("\nWHERE event_name = {}", quote_string(name)));
    }

    Ok(NodeOutput {
        kind: NodeType::Event,
        text,
        metadata: NodeMetadata::Event {
            event_name: event_name.map(str::to_string),
            field_count: projection.len(),
            fallback,
        },
    })
}
