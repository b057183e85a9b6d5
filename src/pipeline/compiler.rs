use super::compiled_plan::{PipelineResult, PlanStats, Stage};
use super::cycle::detect_cycles;
use super::error::{NodeError, PipelineError};
use super::fragment::{NodeOutput, Upstream};
use super::graph::{Adjacency, DependencyGraph};
use super::id::NodeId;
use super::node::{Edge, Node};
use super::nodes::{check_arity, compile_node};
use super::scheduler::schedule;
use crate::config::{CompilerSettings, FailurePolicy};
use crate::types::ExternalContext;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Compiles a pipeline graph into generated query text.
///
/// Stateless: every call rebuilds the dependency graph from scratch, so a
/// compiler can be shared freely and calls never observe each other.
#[derive(Debug, Clone, Default)]
pub struct PipelineCompiler {
    settings: CompilerSettings,
}

/// Compile with default settings.
pub fn compile(nodes: &[Node], edges: &[Edge], ctx: &ExternalContext) -> PipelineResult {
    PipelineCompiler::default().compile(nodes, edges, ctx)
}

impl PipelineCompiler {
    pub fn new(settings: CompilerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// Compile a pipeline graph.
    ///
    /// A cycle aborts the whole run before any node is compiled. Node
    /// failures are recorded per node and compilation of independent
    /// branches carries on.
    ///
    /// # Arguments
    /// * `nodes` - All nodes of the snapshot, in editor order
    /// * `edges` - All edges of the snapshot; dangling ones are ignored
    /// * `ctx` - Database and game identity used to resolve names
    pub fn compile(&self, nodes: &[Node], edges: &[Edge], ctx: &ExternalContext) -> PipelineResult {
        let start_time = std::time::Instant::now();

        tracing::debug!(stage = %Stage::BuildGraph, "{} nodes, {} edges", nodes.len(), edges.len());
        let graph = DependencyGraph::build(nodes, edges);
        let lookup = Self::index_nodes(nodes);
        let mut stats = Self::structural_stats(&graph, &lookup);

        tracing::debug!(stage = %Stage::CheckCycles);
        let report = detect_cycles(&graph);
        if report.has_cycles() {
            let fatal = PipelineError::CycleDetected {
                cycles: report.cycles,
            };
            tracing::warn!("Pipeline compile aborted: {}", fatal);
            return PipelineResult::aborted(fatal, stats);
        }

        tracing::debug!(stage = %Stage::Schedule);
        let execution_order = match schedule(&graph) {
            Ok(order) => order,
            Err(fatal) => return PipelineResult::aborted(fatal, stats),
        };

        tracing::debug!(stage = %Stage::Compile, "{} nodes scheduled", execution_order.len());
        let mut outputs: IndexMap<NodeId, NodeOutput> = IndexMap::new();
        let mut errors: IndexMap<NodeId, NodeError> = IndexMap::new();

        for id in &execution_order {
            let (Some(node), Some(adjacency)) = (lookup.get(id), graph.get(id)) else {
                continue;
            };

            match self.compile_one(node, adjacency, &outputs, &errors, ctx) {
                Ok(output) => {
                    outputs.insert(id.clone(), output);
                }
                Err(err) => {
                    tracing::warn!("{}", err);
                    errors.insert(id.clone(), err);
                }
            }
        }

        tracing::debug!(stage = %Stage::Finalize);
        let final_text = execution_order
            .iter()
            .rev()
            .find_map(|id| outputs.get(id))
            .map(|output| output.text.clone());

        let programs: IndexMap<NodeId, String> = execution_order
            .iter()
            .filter(|id| Self::is_terminal_sink(id, &graph, &lookup))
            .filter_map(|id| outputs.get(id).map(|o| (id.clone(), o.text.clone())))
            .collect();

        stats.scheduled_nodes = execution_order.len();
        stats.compiled_nodes = outputs.len();
        stats.failed_nodes = errors.len();
        stats.skipped_nodes = errors
            .values()
            .filter(|e| matches!(e, NodeError::Skipped { .. }))
            .count();

        tracing::info!(
            "Pipeline compiled: {} ok / {} failed of {} nodes ({}us)",
            stats.compiled_nodes,
            stats.failed_nodes,
            stats.total_nodes,
            start_time.elapsed().as_micros()
        );

        PipelineResult {
            success: errors.is_empty(),
            stage: Stage::Finalize,
            execution_order,
            outputs,
            final_text,
            programs,
            errors,
            cycles: Vec::new(),
            fatal: None,
            stats,
        }
    }

    /// Gather upstream outputs and compile one node.
    fn compile_one(
        &self,
        node: &Node,
        adjacency: &Adjacency,
        outputs: &IndexMap<NodeId, NodeOutput>,
        errors: &IndexMap<NodeId, NodeError>,
        ctx: &ExternalContext,
    ) -> Result<NodeOutput, NodeError> {
        if self.settings.failure_policy == FailurePolicy::SkipDependents {
            if let Some(failed) = adjacency.dependencies.iter().find(|d| errors.contains_key(*d)) {
                return Err(NodeError::Skipped {
                    node_id: node.id.clone(),
                    upstream: failed.clone(),
                });
            }
        }

        // Miswiring is reported as such, even when an upstream also failed
        check_arity(&node.id, node.node_type(), adjacency.dependencies.len())?;

        // Any missing upstream output empties the whole input set; the node
        // then reports its own arity error.
        let inputs: Vec<Upstream<'_>> = adjacency
            .dependencies
            .iter()
            .zip(&adjacency.input_handles)
            .map(|(dep, handle)| {
                outputs.get(dep).map(|output| Upstream {
                    node_id: dep,
                    handle: handle.as_deref(),
                    output,
                })
            })
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default();

        compile_node(node, &inputs, ctx, &self.settings)
    }

    /// Id → node, first occurrence wins (matches graph construction).
    fn index_nodes(nodes: &[Node]) -> HashMap<&NodeId, &Node> {
        let mut lookup = HashMap::with_capacity(nodes.len());
        for node in nodes {
            lookup.entry(&node.id).or_insert(node);
        }
        lookup
    }

    fn structural_stats(graph: &DependencyGraph, lookup: &HashMap<&NodeId, &Node>) -> PlanStats {
        let kinds = || graph.node_ids().filter_map(|id| lookup.get(id)).map(|n| n.node_type());
        PlanStats {
            total_nodes: graph.len(),
            source_nodes: kinds().filter(|k| k.is_source()).count(),
            sink_nodes: kinds().filter(|k| k.is_sink()).count(),
            inert_edges: graph.inert_edges(),
            ..PlanStats::default()
        }
    }

    fn is_terminal_sink(
        id: &NodeId,
        graph: &DependencyGraph,
        lookup: &HashMap<&NodeId, &Node>,
    ) -> bool {
        lookup.get(id).is_some_and(|n| n.node_type().is_sink()) && graph.dependents(id).is_empty()
    }
}
