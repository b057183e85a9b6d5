//! Output node — publishes its input as a view.
//!
//! The view is created in the game's namespace, derived from the numeric
//! game identifier of the external context.

use crate::config::CompilerSettings;
use crate::pipeline::error::NodeError;
use crate::pipeline::fragment::{NodeMetadata, NodeOutput, Upstream};
use crate::pipeline::id::NodeId;
use crate::pipeline::node_type::NodeType;
use crate::types::ExternalContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination view name; required
    #[serde(alias = "destination")]
    pub view_name: Option<String>,
}

impl OutputConfig {
    pub fn named(view_name: impl Into<String>) -> Self {
        Self {
            view_name: Some(view_name.into()),
        }
    }
}

/// Arity (exactly one input) is checked by the caller.
pub(crate) fn compile(
    node_id: &NodeId,
    config: &OutputConfig,
    input: &Upstream<'_>,
    ctx: &ExternalContext,
    settings: &CompilerSettings,
) -> Result<NodeOutput, NodeError> {
    let view_name = config
        .view_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| NodeError::missing_config(node_id, NodeType::Output, "view name"))?;

    let namespace = settings.namespace_for(ctx.numeric_game_identifier);
    let text = format!(
        "CREATE OR REPLACE VIEW {}.{} AS\n{}",
        namespace,
        view_name,
        input.text()
    );

    Ok(NodeOutput {
        kind: NodeType::Output,
        text,
        metadata: NodeMetadata::Output {
            view_name: view_name.to_string(),
            namespace,
        },
    })
}
