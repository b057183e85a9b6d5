use crate::pipeline::error::{NodeError, PipelineError};
use crate::pipeline::fragment::NodeOutput;
use crate::pipeline::id::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages of one compile call.
///
/// A result records the stage it ended in: `Finalize` for a completed run,
/// `Fatal` when a structural error aborted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    BuildGraph,
    CheckCycles,
    Schedule,
    Compile,
    Finalize,
    Fatal,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::BuildGraph => "build-graph",
            Stage::CheckCycles => "check-cycles",
            Stage::Schedule => "schedule",
            Stage::Compile => "compile",
            Stage::Finalize => "finalize",
            Stage::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// Outcome of one compile call.
///
/// Refers only to the exact `(nodes, edges)` snapshot it was compiled from.
/// Two compiles of the same snapshot compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PipelineResult {
    /// No cycle and no node error
    pub success: bool,

    /// Stage the run ended in
    pub stage: Stage,

    /// Node ids in topological order; empty when compilation was aborted
    pub execution_order: Vec<NodeId>,

    /// Compiled output per node, in execution order
    pub outputs: IndexMap<NodeId, NodeOutput>,

    /// Text of the last node in execution order that produced output
    pub final_text: Option<String>,

    /// One program per terminal sink (an output node without dependents)
    pub programs: IndexMap<NodeId, String>,

    /// Validation failures per node, in execution order
    pub errors: IndexMap<NodeId, NodeError>,

    /// Cycles that aborted compilation
    pub cycles: Vec<Vec<NodeId>>,

    /// Structural error that aborted compilation, if any
    pub fatal: Option<PipelineError>,

    /// Compilation statistics
    pub stats: PlanStats,
}

/// Statistics about the compiled plan
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanStats {
    /// Total number of nodes in the graph
    pub total_nodes: usize,

    /// Number of nodes in the execution order
    pub scheduled_nodes: usize,

    /// Number of nodes that produced output
    pub compiled_nodes: usize,

    /// Number of nodes with a validation error (skipped nodes included)
    pub failed_nodes: usize,

    /// Number of nodes skipped because an upstream node failed
    pub skipped_nodes: usize,

    /// Number of source nodes (no input port)
    pub source_nodes: usize,

    /// Number of sink nodes (no output port)
    pub sink_nodes: usize,

    /// Edges ignored because an endpoint was missing
    pub inert_edges: usize,
}

impl PipelineResult {
    /// Result of a compile aborted before any node was compiled
    pub(crate) fn aborted(fatal: PipelineError, stats: PlanStats) -> Self {
        let cycles = match &fatal {
            PipelineError::CycleDetected { cycles } => cycles.clone(),
            PipelineError::Unschedulable { .. } => Vec::new(),
        };
        Self {
            success: false,
            stage: Stage::Fatal,
            cycles,
            fatal: Some(fatal),
            stats,
            ..Self::default()
        }
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn is_fatal(&self) -> bool {
        self.stage == Stage::Fatal
    }

    pub fn output(&self, id: &NodeId) -> Option<&NodeOutput> {
        self.outputs.get(id)
    }

    pub fn error(&self, id: &NodeId) -> Option<&NodeError> {
        self.errors.get(id)
    }
}
