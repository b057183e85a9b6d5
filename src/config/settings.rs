//! Compiler settings
//!
//! These settings decide the names and conventions the generated text uses:
//! where raw events live, which column holds event parameters, which columns
//! an event node falls back to, and how output namespaces are derived.
//! They also select how the compiler reacts to a failed node.
//!
//! Every key is optional in a settings file; missing keys take the defaults
//! below.

use serde::{Deserialize, Serialize};

/// Default raw event table inside the physical database
pub const DEFAULT_EVENTS_TABLE: &str = "events";

/// Default column holding the JSON event parameters
pub const DEFAULT_PARAMETERS_COLUMN: &str = "parameters";

/// Default prefix of per-game output namespaces
pub const DEFAULT_NAMESPACE_PREFIX: &str = "game_";

/// Columns emitted by an event node that has no configured field
pub const DEFAULT_FALLBACK_COLUMNS: &[&str] = &["event_time", "event_name", "user_id", "session_id"];

/// How the compiler treats nodes downstream of a failed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep compiling; dependents see an empty input set and report their
    /// own missing-input error
    #[default]
    Continue,
    /// Record dependents of a failed node as skipped without validating them
    SkipDependents,
}

/// Settings consumed by the pipeline compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Raw event table inside the context's physical database
    pub events_table: String,

    /// Column holding the JSON parameters of an event
    pub parameters_column: String,

    /// Columns selected by an event node without configured fields
    pub fallback_columns: Vec<String>,

    /// Output views live in `<namespace_prefix><game id>`
    pub namespace_prefix: String,

    /// Alias of a join's left input
    pub left_alias: String,

    /// Alias of a join's right input
    pub right_alias: String,

    /// Alias of the derived table wrapped by filter and aggregate nodes
    pub subquery_alias: String,

    /// Reaction to failed nodes
    pub failure_policy: FailurePolicy,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            events_table: DEFAULT_EVENTS_TABLE.to_string(),
            parameters_column: DEFAULT_PARAMETERS_COLUMN.to_string(),
            fallback_columns: DEFAULT_FALLBACK_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            namespace_prefix: DEFAULT_NAMESPACE_PREFIX.to_string(),
            left_alias: "l".to_string(),
            right_alias: "r".to_string(),
            subquery_alias: "src".to_string(),
            failure_policy: FailurePolicy::Continue,
        }
    }
}

impl CompilerSettings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace output views of `game_id` are created in
    pub fn namespace_for(&self, game_id: u64) -> String {
        format!("{}{}", self.namespace_prefix, game_id)
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
